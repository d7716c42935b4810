use crate::application::request::{Confirmation, PaymentRequest};
use crate::domain::payment::{PaymentKind, PaymentMethod};
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Open,
    Pay,
}

/// One row of a batch file.
///
/// `open` rows use `amount` as the order total and `installments` as the
/// planned number of installments. `pay` rows describe one payment; an empty
/// `amount` combined with a `kind` asks the ledger for a suggested amount.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct LedgerRow {
    pub r#type: RowType,
    pub order: u64,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub kind: Option<PaymentKind>,
    #[serde(default)]
    pub installment_amount: Option<String>,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LedgerRow {
    /// Builds the record-payment request for a `pay` row.
    ///
    /// `reference` is routed to the confirmation field of the row's method.
    pub fn to_payment_request(&self) -> PaymentRequest {
        let method = self.method.as_deref().and_then(|m| m.parse::<PaymentMethod>().ok());
        let confirmation = match (method, self.reference.clone()) {
            (Some(PaymentMethod::Zelle), reference) => Confirmation {
                zelle_confirmation: reference,
                ..Confirmation::default()
            },
            (Some(PaymentMethod::Paypal), reference) => Confirmation {
                paypal_transaction_id: reference,
                ..Confirmation::default()
            },
            (Some(PaymentMethod::Check), reference) => Confirmation {
                check_number: reference,
                ..Confirmation::default()
            },
            _ => Confirmation::default(),
        };

        PaymentRequest {
            amount: self.amount.clone().map(Value::String),
            payment_method: self.method.clone(),
            notes: self.notes.clone(),
            confirmation,
            payment_type: self.kind,
            installment_amount: self.installment_amount.clone().map(Value::String),
        }
    }
}

/// Reads ledger rows from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<LedgerRow>`.
/// It handles whitespace trimming and short records automatically.
pub struct LedgerReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> LedgerReader<R> {
    /// Creates a new `LedgerReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn rows(self) -> impl Iterator<Item = Result<LedgerRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::ConfirmationDetails;

    const HEADER: &str = "type, order, amount, method, reference, kind, installment_amount, installments, notes";

    fn read(body: &str) -> Vec<Result<LedgerRow>> {
        let data = format!("{HEADER}\n{body}");
        LedgerReader::new(data.as_bytes()).rows().collect()
    }

    #[test]
    fn test_reader_valid_stream() {
        let rows = read("open, 1, 1000.00, , , , , 4, \npay, 1, 250.00, zelle, ZL-9, , , , first");
        assert_eq!(rows.len(), 2);

        let open = rows[0].as_ref().unwrap();
        assert_eq!(open.r#type, RowType::Open);
        assert_eq!(open.amount.as_deref(), Some("1000.00"));
        assert_eq!(open.installments, Some(4));

        let pay = rows[1].as_ref().unwrap();
        let payment = pay.to_payment_request().validate().unwrap();
        assert_eq!(
            payment.confirmation,
            ConfirmationDetails::Zelle {
                zelle_confirmation: "ZL-9".to_string()
            }
        );
        assert_eq!(payment.notes.as_deref(), Some("first"));
    }

    #[test]
    fn test_reader_accepts_short_rows() {
        let rows = read("pay, 2, 10.00, cash");
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.method.as_deref(), Some("cash"));
        assert_eq!(row.kind, None);
        assert_eq!(row.notes, None);
    }

    #[test]
    fn test_reader_parses_kind() {
        let rows = read("pay, 2, , cash, , full");
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.amount, None);
        assert_eq!(row.kind, Some(PaymentKind::Full));
    }

    #[test]
    fn test_reader_malformed_line() {
        let rows = read("refund, 1, 1.0");
        assert!(rows[0].is_err());

        let rows = read("pay, abc, 1.0, cash");
        assert!(rows[0].is_err());
    }
}
