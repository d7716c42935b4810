use crate::domain::ports::{PaymentNotifier, PaymentStateChanged};
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// Emits payment-state-changed events as structured log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl PaymentNotifier for TracingNotifier {
    async fn payment_recorded(&self, event: &PaymentStateChanged) -> Result<()> {
        info!(
            target: "order_ledger::notifications",
            order_id = event.order_id,
            payment_id = event.payment_id,
            amount = %event.amount,
            from = %event.previous_status,
            to = %event.payment_status,
            total_paid = %event.total_paid,
            remaining = %event.remaining_balance,
            "Payment state changed"
        );
        Ok(())
    }
}

/// Forwards events to a reporting task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<PaymentStateChanged>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PaymentStateChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl PaymentNotifier for ChannelNotifier {
    async fn payment_recorded(&self, event: &PaymentStateChanged) -> Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| LedgerError::NotificationFailure("receiver dropped".to_string()))
    }
}
