use crate::domain::ledger::NewPayment;
use crate::domain::money::{Amount, Money};
use crate::domain::payment::{ConfirmationDetails, PaymentKind, PaymentMethod};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Method-specific proof of payment as submitted by the caller.
#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub zelle_confirmation: Option<String>,
    pub paypal_transaction_id: Option<String>,
    pub check_number: Option<String>,
}

/// A record-payment request as it arrives from the caller.
///
/// Fields stay loosely typed so that each problem maps to its own ledger
/// error instead of a generic decoding failure.
#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Option<Value>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub confirmation: Confirmation,
    /// Caller hint only. Unrecognised values are dropped rather than
    /// failing the request.
    #[serde(default, deserialize_with = "lenient_kind")]
    pub payment_type: Option<PaymentKind>,
    pub installment_amount: Option<Value>,
}

impl PaymentRequest {
    /// Builder-style helper for callers that already hold a typed amount.
    pub fn new(amount: impl ToString, method: PaymentMethod) -> Self {
        Self {
            amount: Some(Value::String(amount.to_string())),
            payment_method: Some(method.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn with_confirmation(mut self, confirmation: Confirmation) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_installment_amount(mut self, amount: impl ToString) -> Self {
        self.installment_amount = Some(Value::String(amount.to_string()));
        self
    }

    /// Checks required fields and method-specific confirmation data.
    pub fn validate(&self) -> Result<NewPayment> {
        let amount = match &self.amount {
            None | Some(Value::Null) => return Err(LedgerError::MissingField { field: "amount" }),
            Some(raw) => parse_amount("amount", raw)?,
        };

        let method = self
            .payment_method
            .as_deref()
            .and_then(|m| m.parse::<PaymentMethod>().ok())
            .ok_or(LedgerError::MissingField {
                field: "paymentMethod",
            })?;

        let confirmation = self.confirmation.details_for(method)?;

        let installment_amount = match &self.installment_amount {
            None | Some(Value::Null) => None,
            Some(raw) => Some(Money::from(parse_amount("installmentAmount", raw)?)),
        };

        Ok(NewPayment {
            amount,
            confirmation,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            installment_amount,
        })
    }
}

impl Confirmation {
    pub fn zelle(code: impl Into<String>) -> Self {
        Self {
            zelle_confirmation: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn paypal(transaction_id: impl Into<String>) -> Self {
        Self {
            paypal_transaction_id: Some(transaction_id.into()),
            ..Self::default()
        }
    }

    fn details_for(&self, method: PaymentMethod) -> Result<ConfirmationDetails> {
        match method {
            PaymentMethod::Cash => Ok(ConfirmationDetails::Cash),
            PaymentMethod::Check => Ok(ConfirmationDetails::Check {
                check_number: non_blank(&self.check_number),
            }),
            PaymentMethod::Zelle => non_blank(&self.zelle_confirmation)
                .map(|zelle_confirmation| ConfirmationDetails::Zelle { zelle_confirmation })
                .ok_or(LedgerError::MissingConfirmation {
                    method,
                    field: "zelleConfirmation",
                }),
            PaymentMethod::Paypal => non_blank(&self.paypal_transaction_id)
                .map(|paypal_transaction_id| ConfirmationDetails::Paypal {
                    paypal_transaction_id,
                })
                .ok_or(LedgerError::MissingConfirmation {
                    method,
                    field: "paypalTransactionId",
                }),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lenient_kind<'de, D>(deserializer: D) -> std::result::Result<Option<PaymentKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// JSON numbers arrive already parsed as `f64`, so only about 15
/// significant digits survive. Numeric strings are parsed exactly.
fn parse_amount(field: &'static str, raw: &Value) -> Result<Amount> {
    match raw {
        Value::String(s) => Amount::parse(field, s),
        Value::Number(n) => Amount::parse(field, &n.to_string()),
        other => Err(LedgerError::InvalidAmount {
            field,
            value: other.to_string(),
        }),
    }
}
