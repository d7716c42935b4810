use super::money::{Amount, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Check,
    Zelle,
    Paypal,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Check => "check",
            PaymentMethod::Zelle => "zelle",
            PaymentMethod::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "check" => Ok(PaymentMethod::Check),
            "zelle" => Ok(PaymentMethod::Zelle),
            "paypal" => Ok(PaymentMethod::Paypal),
            _ => Err(()),
        }
    }
}

/// Persisted payment type, derived from the order's history at recording time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Initial,
    Installment,
}

/// Caller hint selecting which amount to propose. Never persisted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Full,
    Installment,
}

/// Proof-of-payment data, shaped by the payment method.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ConfirmationDetails {
    Cash,
    Check {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        check_number: Option<String>,
    },
    Zelle {
        zelle_confirmation: String,
    },
    Paypal {
        paypal_transaction_id: String,
    },
}

impl ConfirmationDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            ConfirmationDetails::Cash => PaymentMethod::Cash,
            ConfirmationDetails::Check { .. } => PaymentMethod::Check,
            ConfirmationDetails::Zelle { .. } => PaymentMethod::Zelle,
            ConfirmationDetails::Paypal { .. } => PaymentMethod::Paypal,
        }
    }
}

/// One entry of an order's append-only payment history.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Payment {
    /// Order-local ordinal, starting at 1.
    pub id: u32,
    pub order_id: u64,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub confirmation_details: ConfirmationDetails,
    /// The order's sticky installment amount when this payment was taken.
    pub installment_amount: Option<Money>,
    pub created_at: DateTime<Utc>,
}
