use crate::domain::ledger::OrderLedger;
use crate::domain::ports::{OrderPersistenceWriter, OrderSnapshotProvider};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing order ledgers.
pub const CF_ORDERS: &str = "orders";

/// A persistent store implementation using RocksDB.
///
/// Each ledger is stored as JSON under the big-endian bytes of its order id,
/// so iteration yields orders in id order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
/// Conditional writes are serialized by a store-wide mutex around the
/// read-compare-put sequence.
#[derive(Clone)]
pub struct RocksDbOrderStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDbOrderStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "orders" column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders])
            .map_err(LedgerError::persistence)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn read(&self, order_id: u64) -> Result<Option<OrderLedger>> {
        let cf = self.orders_cf()?;
        let bytes = self
            .db
            .get_cf(cf, order_id.to_be_bytes())
            .map_err(LedgerError::persistence)?;

        bytes
            .map(|b| serde_json::from_slice(&b).map_err(LedgerError::persistence))
            .transpose()
    }

    fn write(&self, ledger: &OrderLedger) -> Result<()> {
        let cf = self.orders_cf()?;
        let value = serde_json::to_vec(ledger).map_err(LedgerError::persistence)?;
        self.db
            .put_cf(cf, ledger.order_id.to_be_bytes(), value)
            .map_err(LedgerError::persistence)
    }

    fn orders_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_ORDERS)
            .ok_or_else(|| LedgerError::persistence("Orders column family not found"))
    }
}

#[async_trait]
impl OrderSnapshotProvider for RocksDbOrderStore {
    async fn get(&self, order_id: u64) -> Result<Option<OrderLedger>> {
        self.read(order_id)
    }

    async fn all_orders(&self) -> Result<Vec<OrderLedger>> {
        let cf = self.orders_cf()?;
        let mut orders = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(LedgerError::persistence)?;
            orders.push(serde_json::from_slice(&value).map_err(LedgerError::persistence)?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderPersistenceWriter for RocksDbOrderStore {
    async fn create(&self, ledger: OrderLedger) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.read(ledger.order_id)?.is_some() {
            return Err(LedgerError::OrderExists {
                order_id: ledger.order_id,
            });
        }
        self.write(&ledger)
    }

    async fn compare_and_store(&self, ledger: OrderLedger, expected_history_len: usize) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let order_id = ledger.order_id;
        match self.read(order_id)? {
            None => Err(LedgerError::OrderNotFound { order_id }),
            Some(current) if current.payment_history.len() != expected_history_len => {
                Err(LedgerError::Conflict { order_id })
            }
            Some(_) => self.write(&ledger),
        }
    }
}
