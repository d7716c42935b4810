//! Batch input and summary output for the command line.

pub mod ledger_reader;
pub mod ledger_writer;
