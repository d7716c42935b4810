use super::installment::{self, SuggestionInput};
use super::money::{Amount, Money};
use super::payment::{ConfirmationDetails, Payment, PaymentKind, PaymentType};
use super::status::PaymentStatus;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A payment that passed request validation and is ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub amount: Amount,
    pub confirmation: ConfirmationDetails,
    pub notes: Option<String>,
    /// Only honoured when this is the order's first payment.
    pub installment_amount: Option<Money>,
}

/// The payment state of one order.
///
/// `payment_history` only grows at the tail, and `total_paid` always equals
/// the sum of its amounts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderLedger {
    pub order_id: u64,
    pub total_amount: Money,
    pub payment_history: Vec<Payment>,
    pub total_paid: Money,
    pub payment_status: PaymentStatus,
    /// Set by the first payment, read-only afterwards.
    pub installment_amount: Option<Money>,
    pub number_of_installments: Option<u32>,
}

impl OrderLedger {
    pub fn new(order_id: u64, total_amount: Money, number_of_installments: Option<u32>) -> Self {
        Self {
            order_id,
            total_amount,
            payment_history: Vec::new(),
            total_paid: Money::ZERO,
            payment_status: PaymentStatus::Pending,
            installment_amount: None,
            number_of_installments,
        }
    }

    pub fn remaining_balance(&self) -> Money {
        self.total_amount - self.total_paid
    }

    /// Validates `payment` against the remaining balance, appends it and
    /// recomputes the derived totals.
    ///
    /// On error the ledger is left untouched.
    pub fn record(&mut self, payment: NewPayment, now: DateTime<Utc>) -> Result<&Payment, LedgerError> {
        let remaining = self.remaining_balance();
        let amount = Money::from(payment.amount);
        if amount > remaining {
            return Err(LedgerError::ExceedsBalance {
                attempted: amount,
                maximum: remaining,
            });
        }

        let payment_type = if self.payment_history.is_empty() {
            self.installment_amount = payment.installment_amount;
            PaymentType::Initial
        } else {
            PaymentType::Installment
        };

        let id = self.next_payment_id();
        self.payment_history.push(Payment {
            id,
            order_id: self.order_id,
            amount: payment.amount,
            payment_method: payment.confirmation.method(),
            payment_type,
            notes: payment.notes,
            confirmation_details: payment.confirmation,
            installment_amount: self.installment_amount,
            created_at: now,
        });
        self.total_paid += amount;
        self.payment_status = self
            .payment_status
            .advance(self.total_paid, self.total_amount);

        Ok(&self.payment_history[self.payment_history.len() - 1])
    }

    /// Proposed amount for the given payment kind.
    pub fn suggest(&self, kind: PaymentKind, total_due_after_first: Option<Money>) -> Money {
        installment::suggest(
            kind,
            SuggestionInput {
                total_amount: self.total_amount,
                remaining_balance: self.remaining_balance(),
                has_payments: !self.payment_history.is_empty(),
                installment_amount: self.installment_amount,
                total_due_after_first,
            },
        )
    }

    fn next_payment_id(&self) -> u32 {
        u32::try_from(self.payment_history.len()).map_or(u32::MAX, |len| len.saturating_add(1))
    }
}
