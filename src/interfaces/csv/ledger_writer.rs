use crate::application::ledger::LedgerSnapshot;
use crate::domain::money::Money;
use crate::domain::status::PaymentStatus;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SummaryRow {
    order: u64,
    total_amount: Money,
    total_paid: Money,
    remaining_balance: Money,
    payment_status: PaymentStatus,
    installment_amount: Option<Money>,
    payments: usize,
}

impl From<&LedgerSnapshot> for SummaryRow {
    fn from(snapshot: &LedgerSnapshot) -> Self {
        Self {
            order: snapshot.order_id,
            total_amount: snapshot.total_amount,
            total_paid: snapshot.total_paid,
            remaining_balance: snapshot.remaining_balance,
            payment_status: snapshot.payment_status,
            installment_amount: snapshot.installment_amount,
            payments: snapshot.payment_history.len(),
        }
    }
}

/// Writes one summary line per order ledger as CSV.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_ledgers(&mut self, ledgers: &[LedgerSnapshot]) -> Result<()> {
        for ledger in ledgers {
            self.writer.serialize(SummaryRow::from(ledger))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
