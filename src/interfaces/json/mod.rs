//! Wire shapes of the ledger-state and record-payment calls.

pub mod responses;
