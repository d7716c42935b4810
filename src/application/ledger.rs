use super::request::PaymentRequest;
use crate::domain::ledger::OrderLedger;
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentKind};
use crate::domain::ports::{
    OrderPersistenceWriterBox, OrderSnapshotProviderBox, PaymentNotifierBox, PaymentStateChanged,
};
use crate::domain::status::PaymentStatus;
use crate::error::{LedgerError, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Read-only view of an order's ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub order_id: u64,
    pub payment_history: Vec<Payment>,
    pub total_paid: Money,
    pub total_amount: Money,
    pub installment_amount: Option<Money>,
    pub number_of_installments: Option<u32>,
    pub payment_status: PaymentStatus,
    pub remaining_balance: Money,
}

impl From<OrderLedger> for LedgerSnapshot {
    fn from(ledger: OrderLedger) -> Self {
        let remaining_balance = ledger.remaining_balance();
        Self {
            order_id: ledger.order_id,
            payment_history: ledger.payment_history,
            total_paid: ledger.total_paid,
            total_amount: ledger.total_amount,
            installment_amount: ledger.installment_amount,
            number_of_installments: ledger.number_of_installments,
            payment_status: ledger.payment_status,
            remaining_balance,
        }
    }
}

/// Outcome of a successful `record_payment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub total_paid: Money,
    pub payment_status: PaymentStatus,
    pub remaining_balance: Money,
    pub installment_amount: Option<Money>,
    pub number_of_installments: Option<u32>,
}

/// Records payments against orders.
///
/// Each `record_payment` runs its read-validate-append-write sequence while
/// holding a lock scoped to the order, and the write itself is conditional on
/// the history length that was read. Calls for different orders do not
/// contend.
pub struct PaymentLedger {
    snapshots: OrderSnapshotProviderBox,
    writer: OrderPersistenceWriterBox,
    notifier: Option<PaymentNotifierBox>,
    order_locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl PaymentLedger {
    /// Creates a new `PaymentLedger`.
    ///
    /// # Arguments
    ///
    /// * `snapshots` - Where current ledger state is read from.
    /// * `writer` - Where updated ledger state is written to.
    pub fn new(snapshots: OrderSnapshotProviderBox, writer: OrderPersistenceWriterBox) -> Self {
        Self {
            snapshots,
            writer,
            notifier: None,
            order_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attaches a collaborator that is told about every recorded payment.
    pub fn with_notifier(mut self, notifier: PaymentNotifierBox) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Starts an empty ledger for a newly created order.
    pub async fn open_order(
        &self,
        order_id: u64,
        total_amount: Money,
        number_of_installments: Option<u32>,
    ) -> Result<LedgerSnapshot> {
        if total_amount < Money::ZERO {
            return Err(LedgerError::InvalidAmount {
                field: "totalAmount",
                value: total_amount.value().to_string(),
            });
        }
        let ledger = OrderLedger::new(order_id, total_amount, number_of_installments);
        self.writer.create(ledger.clone()).await?;
        info!(order_id, total_amount = %total_amount, "Opened order ledger");
        Ok(ledger.into())
    }

    /// Validates and records one payment, returning the updated totals.
    pub async fn record_payment(&self, order_id: u64, request: PaymentRequest) -> Result<PaymentReceipt> {
        let lock = self.order_lock(order_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.record_locked(order_id, request).await
        };
        self.release_lock(order_id, lock).await;
        result
    }

    async fn record_locked(&self, order_id: u64, request: PaymentRequest) -> Result<PaymentReceipt> {
        let mut ledger = self.load(order_id).await?;
        let new_payment = request.validate()?;
        if let Some(kind) = request.payment_type {
            debug!(order_id, ?kind, "Payment type hint received");
        }

        let previous_status = ledger.payment_status;
        let expected_history_len = ledger.payment_history.len();
        let payment = ledger
            .record(new_payment, Utc::now())
            .inspect_err(|e| warn!(order_id, error = %e, "Payment rejected"))?
            .clone();

        self.writer
            .compare_and_store(ledger.clone(), expected_history_len)
            .await?;

        let remaining_balance = ledger.remaining_balance();
        info!(
            order_id,
            payment_id = payment.id,
            amount = %payment.amount,
            method = %payment.payment_method,
            status = %ledger.payment_status,
            remaining = %remaining_balance,
            "Recorded payment"
        );

        self.notify(PaymentStateChanged {
            order_id,
            payment_id: payment.id,
            amount: payment.amount,
            previous_status,
            payment_status: ledger.payment_status,
            total_paid: ledger.total_paid,
            remaining_balance,
        })
        .await;

        Ok(PaymentReceipt {
            payment,
            total_paid: ledger.total_paid,
            payment_status: ledger.payment_status,
            remaining_balance,
            installment_amount: ledger.installment_amount,
            number_of_installments: ledger.number_of_installments,
        })
    }

    /// Returns the current ledger of an order.
    pub async fn get_ledger(&self, order_id: u64) -> Result<LedgerSnapshot> {
        self.load(order_id).await.map(LedgerSnapshot::from)
    }

    /// Proposes an amount for the "pay in full" or "pay an installment" action.
    ///
    /// The proposal still has to go through `record_payment`.
    pub async fn suggest_amount(
        &self,
        order_id: u64,
        kind: PaymentKind,
        total_due_after_first: Option<Money>,
    ) -> Result<Money> {
        let ledger = self.load(order_id).await?;
        let amount = ledger.suggest(kind, total_due_after_first);
        debug!(order_id, ?kind, amount = %amount, "Suggested payment amount");
        Ok(amount)
    }

    /// All known ledgers, ordered by order id.
    pub async fn list_ledgers(&self) -> Result<Vec<LedgerSnapshot>> {
        let mut ledgers = self.snapshots.all_orders().await?;
        ledgers.sort_by_key(|l| l.order_id);
        Ok(ledgers.into_iter().map(LedgerSnapshot::from).collect())
    }

    async fn load(&self, order_id: u64) -> Result<OrderLedger> {
        debug!(order_id, "Loading order ledger");
        self.snapshots
            .get(order_id)
            .await?
            .ok_or(LedgerError::OrderNotFound { order_id })
    }

    async fn order_lock(&self, order_id: u64) -> Arc<Mutex<()>> {
        let mut locks = self.order_locks.lock().await;
        locks.entry(order_id).or_default().clone()
    }

    /// Drops the order's lock entry once no other call holds or awaits it.
    ///
    /// Clones are only handed out under the map lock, so a count of two
    /// (the map plus `lock`) means nobody else is using it.
    async fn release_lock(&self, order_id: u64, lock: Arc<Mutex<()>>) {
        let mut locks = self.order_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&order_id);
        }
    }

    async fn notify(&self, event: PaymentStateChanged) {
        if let Some(notifier) = &self.notifier
            && let Err(e) = notifier.payment_recorded(&event).await
        {
            warn!(order_id = event.order_id, error = %e, "Failed to deliver payment notification");
        }
    }
}
