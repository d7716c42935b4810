use super::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of an order.
///
/// Variants are declared in lifecycle order, so `Ord` follows progression.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Completed,
}

impl PaymentStatus {
    /// The single transition function of the status machine.
    ///
    /// Never returns a status behind `self`, so a completed order stays
    /// completed whatever totals are passed in.
    pub fn advance(self, total_paid: Money, total_amount: Money) -> PaymentStatus {
        let target = if total_paid >= total_amount && !total_paid.is_zero() {
            PaymentStatus::Completed
        } else if total_paid.is_zero() {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Partial
        };
        self.max(target)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
