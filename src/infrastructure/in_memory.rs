use crate::domain::ledger::OrderLedger;
use crate::domain::ports::{OrderPersistenceWriter, OrderSnapshotProvider};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for order ledgers.
///
/// Uses `Arc<RwLock<HashMap<u64, OrderLedger>>>` to allow shared concurrent access.
/// Clones share the same map, so one instance can serve as both the snapshot
/// provider and the persistence writer.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<u64, OrderLedger>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderSnapshotProvider for InMemoryOrderStore {
    async fn get(&self, order_id: u64) -> Result<Option<OrderLedger>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn all_orders(&self) -> Result<Vec<OrderLedger>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }
}

#[async_trait]
impl OrderPersistenceWriter for InMemoryOrderStore {
    async fn create(&self, ledger: OrderLedger) -> Result<()> {
        let mut orders = self.orders.write().await;
        match orders.entry(ledger.order_id) {
            Entry::Occupied(_) => Err(LedgerError::OrderExists {
                order_id: ledger.order_id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(ledger);
                Ok(())
            }
        }
    }

    async fn compare_and_store(&self, ledger: OrderLedger, expected_history_len: usize) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order_id = ledger.order_id;
        match orders.get_mut(&order_id) {
            None => Err(LedgerError::OrderNotFound { order_id }),
            Some(current) if current.payment_history.len() != expected_history_len => {
                Err(LedgerError::Conflict { order_id })
            }
            Some(current) => {
                *current = ledger;
                Ok(())
            }
        }
    }
}
