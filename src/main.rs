use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use order_ledger::application::ledger::PaymentLedger;
use order_ledger::application::request::PaymentRequest;
use order_ledger::domain::money::Money;
use order_ledger::domain::payment::PaymentKind;
use order_ledger::domain::ports::{OrderPersistenceWriterBox, OrderSnapshotProviderBox};
use order_ledger::error::LedgerError;
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;
use order_ledger::infrastructure::notifier::TracingNotifier;
use order_ledger::interfaces::csv::ledger_reader::{LedgerReader, LedgerRow, RowType};
use order_ledger::interfaces::csv::ledger_writer::LedgerWriter;
use order_ledger::interfaces::json::responses::{
    ErrorResponse, LedgerStateResponse, RecordPaymentResponse,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "ORDER_LEDGER_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Log output format (written to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "ORDER_LEDGER_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a CSV batch of `open` and `pay` rows and print a ledger summary
    Apply {
        /// Input CSV file
        input: PathBuf,
    },
    /// Open the ledger of a new order
    Open {
        order: u64,
        #[arg(long)]
        total: Decimal,
        #[arg(long)]
        installments: Option<u32>,
    },
    /// Record one payment given as a JSON request body
    Record { order: u64, request: String },
    /// Print the ledger of an order as JSON
    Show { order: u64 },
    /// Propose an amount for a full or installment payment
    Suggest {
        order: u64,
        #[arg(long, value_enum)]
        kind: KindArg,
        #[arg(long)]
        total_due_after_first: Option<Decimal>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Full,
    Installment,
}

impl From<KindArg> for PaymentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Full => PaymentKind::Full,
            KindArg::Installment => PaymentKind::Installment,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let (snapshots, writer) = open_stores(cli.db_path)?;
    let ledger = PaymentLedger::new(snapshots, writer).with_notifier(Box::new(TracingNotifier));

    match cli.command {
        Command::Apply { input } => {
            let file = File::open(input).into_diagnostic()?;
            apply_batch(&ledger, LedgerReader::new(file)).await;

            let ledgers = ledger.list_ledgers().await?;
            info!(orders = ledgers.len(), "Batch applied");
            let stdout = io::stdout();
            let mut writer = LedgerWriter::new(stdout.lock());
            writer.write_ledgers(&ledgers)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Open {
            order,
            total,
            installments,
        } => respond(
            ledger
                .open_order(order, Money::new(total), installments)
                .await
                .map(LedgerStateResponse::from),
        ),
        Command::Record { order, request } => {
            let request: PaymentRequest = serde_json::from_str(&request).into_diagnostic()?;
            respond(
                ledger
                    .record_payment(order, request)
                    .await
                    .map(RecordPaymentResponse::from),
            )
        }
        Command::Show { order } => respond(ledger.get_ledger(order).await.map(LedgerStateResponse::from)),
        Command::Suggest {
            order,
            kind,
            total_due_after_first,
        } => {
            let amount = ledger
                .suggest_amount(order, kind.into(), total_due_after_first.map(Money::new))
                .await;
            respond(amount.map(|amount| serde_json::json!({ "success": true, "amount": amount })))
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("order_ledger=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal());
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<PathBuf>) -> Result<(OrderSnapshotProviderBox, OrderPersistenceWriterBox)> {
    use order_ledger::infrastructure::rocksdb::RocksDbOrderStore;

    if let Some(db_path) = db_path {
        info!(path = %db_path.display(), "Using RocksDB storage");
        let store = RocksDbOrderStore::open(db_path)?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<PathBuf>) -> Result<(OrderSnapshotProviderBox, OrderPersistenceWriterBox)> {
    if db_path.is_some() {
        warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> (OrderSnapshotProviderBox, OrderPersistenceWriterBox) {
    let store = InMemoryOrderStore::new();
    (Box::new(store.clone()), Box::new(store))
}

/// Applies every row in order. Bad rows are logged and skipped.
async fn apply_batch<R: io::Read>(ledger: &PaymentLedger, reader: LedgerReader<R>) {
    for (index, row) in reader.rows().enumerate() {
        let line = index + 2;
        let result = match row {
            Ok(row) => apply_row(ledger, &row).await,
            Err(e) => {
                warn!(line, error = %e, "Error reading row");
                continue;
            }
        };
        if let Err(e) = result {
            warn!(line, error = %e, "Row rejected");
        }
    }
}

async fn apply_row(ledger: &PaymentLedger, row: &LedgerRow) -> Result<(), LedgerError> {
    match row.r#type {
        RowType::Open => {
            let total = match row.amount.as_deref() {
                None => return Err(LedgerError::MissingField { field: "amount" }),
                Some(raw) => Decimal::from_str(raw).map_err(|_| LedgerError::InvalidAmount {
                    field: "amount",
                    value: raw.to_string(),
                })?,
            };
            ledger
                .open_order(row.order, Money::new(total), row.installments)
                .await?;
        }
        RowType::Pay => {
            let mut request = row.to_payment_request();
            if request.amount.is_none()
                && let Some(kind) = row.kind
            {
                let proposed = ledger.suggest_amount(row.order, kind, None).await?;
                request.amount = Some(serde_json::Value::String(proposed.value().to_string()));
            }
            ledger.record_payment(row.order, request).await?;
        }
    }
    Ok(())
}

/// Prints a success body or the matching error body as JSON.
fn respond<T: Serialize>(result: Result<T, LedgerError>) -> Result<ExitCode> {
    let (body, code) = match result {
        Ok(body) => (serde_json::to_string_pretty(&body), ExitCode::SUCCESS),
        Err(e) => {
            warn!(error = %e, "Request failed");
            (
                serde_json::to_string_pretty(&ErrorResponse::from(&e)),
                ExitCode::FAILURE,
            )
        }
    };
    println!("{}", body.into_diagnostic()?);
    Ok(code)
}
