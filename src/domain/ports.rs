use super::ledger::OrderLedger;
use super::money::{Amount, Money};
use super::status::PaymentStatus;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Supplies the current payment state of an order.
#[async_trait]
pub trait OrderSnapshotProvider: Send + Sync {
    async fn get(&self, order_id: u64) -> Result<Option<OrderLedger>>;
    async fn all_orders(&self) -> Result<Vec<OrderLedger>>;
}

/// Durable storage for ledger state.
#[async_trait]
pub trait OrderPersistenceWriter: Send + Sync {
    /// Stores a fresh ledger. Fails with `OrderExists` if the id is taken.
    async fn create(&self, ledger: OrderLedger) -> Result<()>;

    /// Replaces the stored ledger only if its history still holds
    /// `expected_history_len` payments, failing with `Conflict` otherwise.
    async fn compare_and_store(&self, ledger: OrderLedger, expected_history_len: usize) -> Result<()>;
}

/// Emitted after a payment has been durably recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentStateChanged {
    pub order_id: u64,
    pub payment_id: u32,
    pub amount: Amount,
    pub previous_status: PaymentStatus,
    pub payment_status: PaymentStatus,
    pub total_paid: Money,
    pub remaining_balance: Money,
}

/// Receives payment-state-changed events for reporting and email.
#[async_trait]
pub trait PaymentNotifier: Send + Sync {
    async fn payment_recorded(&self, event: &PaymentStateChanged) -> Result<()>;
}

pub type OrderSnapshotProviderBox = Box<dyn OrderSnapshotProvider>;
pub type OrderPersistenceWriterBox = Box<dyn OrderPersistenceWriter>;
pub type PaymentNotifierBox = Box<dyn PaymentNotifier>;
