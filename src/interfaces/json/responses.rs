use crate::application::ledger::{LedgerSnapshot, PaymentReceipt};
use crate::domain::money::Money;
use crate::domain::payment::Payment;
use crate::domain::status::PaymentStatus;
use crate::error::LedgerError;
use serde::Serialize;

/// Body of a successful ledger-state read.
#[derive(Debug, Serialize)]
pub struct LedgerStateResponse {
    pub success: bool,
    pub payment_history: Vec<Payment>,
    pub total_paid: Money,
    pub total_amount: Money,
    pub installment_amount: Option<Money>,
    pub number_of_installments: Option<u32>,
}

impl From<LedgerSnapshot> for LedgerStateResponse {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self {
            success: true,
            payment_history: snapshot.payment_history,
            total_paid: snapshot.total_paid,
            total_amount: snapshot.total_amount,
            installment_amount: snapshot.installment_amount,
            number_of_installments: snapshot.number_of_installments,
        }
    }
}

/// Body of a successful record-payment call.
#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub success: bool,
    pub payment: Payment,
    pub total_paid: Money,
    pub payment_status: PaymentStatus,
    pub remaining_balance: Money,
    pub installment_amount: Option<Money>,
    pub number_of_installments: Option<u32>,
}

impl From<PaymentReceipt> for RecordPaymentResponse {
    fn from(receipt: PaymentReceipt) -> Self {
        Self {
            success: true,
            payment: receipt.payment,
            total_paid: receipt.total_paid,
            payment_status: receipt.payment_status,
            remaining_balance: receipt.remaining_balance,
            installment_amount: receipt.installment_amount,
            number_of_installments: receipt.number_of_installments,
        }
    }
}

/// Body of any failed call. `details` is the human-readable reason, e.g.
/// the maximum payment allowed.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub details: String,
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        let details = match err {
            LedgerError::PersistenceFailure(_) => "failed to save payment".to_string(),
            other => other.to_string(),
        };
        Self {
            success: false,
            error: err.code(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::OrderLedger;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_state_response_shape() {
        let ledger = OrderLedger::new(1, Money::new(dec!(500.00)), Some(2));
        let json = serde_json::to_value(LedgerStateResponse::from(LedgerSnapshot::from(ledger))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "payment_history": [],
                "total_paid": "0",
                "total_amount": "500.00",
                "installment_amount": null,
                "number_of_installments": 2,
            })
        );
    }

    #[test]
    fn test_error_response_carries_details() {
        let err = LedgerError::ExceedsBalance {
            attempted: Money::new(dec!(600)),
            maximum: Money::new(dec!(500)),
        };
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "exceeds_balance");
        assert!(
            json["details"]
                .as_str()
                .unwrap()
                .contains("maximum payment allowed is $500.00")
        );
    }

    #[test]
    fn test_persistence_failure_is_generic() {
        let err = LedgerError::persistence("disk full at /var/lib/ledger");
        let response = ErrorResponse::from(&err);
        assert_eq!(response.error, "persistence_failure");
        assert_eq!(response.details, "failed to save payment");
    }
}
