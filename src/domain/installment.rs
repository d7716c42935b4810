//! Proposed payment amounts for the "pay in full" and "pay an installment"
//! actions offered to the caller.

use super::money::Money;
use super::payment::PaymentKind;
use rust_decimal::Decimal;

/// Inputs of the suggestion policy, taken from a ledger snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput {
    pub total_amount: Money,
    pub remaining_balance: Money,
    pub has_payments: bool,
    pub installment_amount: Option<Money>,
    /// Schedule hint: what is due after the first payment.
    pub total_due_after_first: Option<Money>,
}

/// Returns the amount to propose for `kind`, rounded to cents and capped at
/// the remaining balance.
pub fn suggest(kind: PaymentKind, input: SuggestionInput) -> Money {
    let remaining = input.remaining_balance;
    let proposed = match kind {
        PaymentKind::Full => remaining,
        PaymentKind::Installment if input.has_payments => {
            input.installment_amount.unwrap_or(remaining)
        }
        PaymentKind::Installment => first_installment(input).unwrap_or(remaining),
    };
    proposed.min(remaining).to_cents()
}

/// `remaining / ceil(total_due_after_first / total_amount)`, when defined.
fn first_installment(input: SuggestionInput) -> Option<Money> {
    let due = input.total_due_after_first?.value();
    let total = input.total_amount.value();
    if total <= Decimal::ZERO {
        return None;
    }
    let divisor = due.checked_div(total)?.ceil();
    if divisor <= Decimal::ZERO {
        return None;
    }
    input
        .remaining_balance
        .value()
        .checked_div(divisor)
        .map(Money::new)
}
