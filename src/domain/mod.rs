//! Domain layer: value objects, the order ledger aggregate and the ports it
//! needs from storage and reporting.

pub mod installment;
pub mod ledger;
pub mod money;
pub mod payment;
pub mod ports;
pub mod status;
