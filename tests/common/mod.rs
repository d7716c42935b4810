#![allow(dead_code)]

use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const HEADER: [&str; 9] = [
    "type",
    "order",
    "amount",
    "method",
    "reference",
    "kind",
    "installment_amount",
    "installments",
    "notes",
];

/// Writes a batch file with the standard header followed by `rows`.
pub fn batch_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER.join(", ")).unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

/// Generates `orders` orders of 100.00, each paid off with four 25.00 cash
/// payments interleaved across orders.
pub fn generate_batch(path: &Path, orders: u64) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);
    wtr.write_record(HEADER)?;

    for order in 1..=orders {
        wtr.write_record(["open", &order.to_string(), "100.00"])?;
    }
    for _ in 0..4 {
        for order in 1..=orders {
            wtr.write_record(["pay", &order.to_string(), "25.00", "cash"])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
