//! Application layer containing the ledger orchestration.
//!
//! `PaymentLedger` is the entry point for recording payments. It sequences
//! snapshot loads, domain validation, conditional writes and notifications.

pub mod ledger;
pub mod request;
