use crate::domain::money::Money;
use crate::domain::payment::PaymentMethod;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every way a ledger call can fail.
///
/// Validation variants carry enough detail for the caller to correct the
/// request and resubmit. None of them leave a partially applied payment
/// behind.
#[derive(Error, Diagnostic, Debug)]
pub enum LedgerError {
    #[error("order {order_id} not found")]
    #[diagnostic(code(ledger::order_not_found))]
    OrderNotFound { order_id: u64 },

    #[error("order {order_id} already exists")]
    #[diagnostic(code(ledger::order_exists))]
    OrderExists { order_id: u64 },

    #[error("missing required field `{field}`")]
    #[diagnostic(code(ledger::missing_field))]
    MissingField { field: &'static str },

    #[error("invalid amount for `{field}`: {value:?}")]
    #[diagnostic(
        code(ledger::invalid_amount),
        help("amounts must be positive decimal numbers, e.g. 250.00")
    )]
    InvalidAmount { field: &'static str, value: String },

    #[error("{method} payments require `{field}`")]
    #[diagnostic(code(ledger::missing_confirmation))]
    MissingConfirmation {
        method: PaymentMethod,
        field: &'static str,
    },

    #[error("payment of {attempted} exceeds the remaining balance; maximum payment allowed is {maximum}")]
    #[diagnostic(code(ledger::exceeds_balance))]
    ExceedsBalance { attempted: Money, maximum: Money },

    #[error("order {order_id} was modified concurrently")]
    #[diagnostic(code(ledger::conflict), help("reload the ledger and resubmit the payment"))]
    Conflict { order_id: u64 },

    #[error("failed to persist ledger state: {0}")]
    #[diagnostic(code(ledger::persistence_failure))]
    PersistenceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to deliver notification: {0}")]
    #[diagnostic(code(ledger::notification_failure))]
    NotificationFailure(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Stable machine-readable code used in wire responses.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::OrderNotFound { .. } => "order_not_found",
            LedgerError::OrderExists { .. } => "order_exists",
            LedgerError::MissingField { .. } => "missing_field",
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::MissingConfirmation { .. } => "missing_confirmation",
            LedgerError::ExceedsBalance { .. } => "exceeds_balance",
            LedgerError::Conflict { .. } => "conflict",
            LedgerError::PersistenceFailure(_) => "persistence_failure",
            LedgerError::NotificationFailure(_) => "notification_failure",
            LedgerError::Csv(_) | LedgerError::Io(_) => "internal_error",
        }
    }

    pub(crate) fn persistence<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LedgerError::PersistenceFailure(err.into())
    }
}
