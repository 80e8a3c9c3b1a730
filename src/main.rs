use clap::{Parser, ValueEnum};
use invoice_payments::application::processor::PaymentProcessor;
use invoice_payments::domain::ports::{InvoiceRepository, InvoiceRepositoryBox};
use invoice_payments::infrastructure::in_memory::InMemoryInvoiceRepository;
use invoice_payments::interfaces::csv::invoice_reader::InvoiceReader;
use invoice_payments::interfaces::csv::payment_reader::PaymentReader;
use invoice_payments::interfaces::csv::report_writer::{InvoiceWriter, OutcomeWriter};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    /// One row per payment with its outcome message
    Outcomes,
    /// Final state of every invoice
    Invoices,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input payments CSV file (reference, amount)
    payments: PathBuf,

    /// Invoices CSV file (reference, amount, type) to register before processing.
    /// References already present in the repository are left untouched.
    #[arg(long)]
    invoices: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Report written to stdout
    #[arg(long, value_enum, default_value_t = Report::Outcomes)]
    report: Report,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_repository(db_path: Option<PathBuf>) -> Result<InvoiceRepositoryBox> {
    use invoice_payments::infrastructure::rocksdb::RocksDBStore;

    match db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using RocksDB storage");
            Ok(Box::new(RocksDBStore::open(path).into_diagnostic()?))
        }
        None => Ok(Box::new(InMemoryInvoiceRepository::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_repository(db_path: Option<PathBuf>) -> Result<InvoiceRepositoryBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryInvoiceRepository::new()))
}

async fn register_invoices(repository: &dyn InvoiceRepository, path: PathBuf) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    for invoice_result in InvoiceReader::new(file).invoices() {
        match invoice_result {
            Ok(invoice) => {
                if repository
                    .load(invoice.reference())
                    .await
                    .into_diagnostic()?
                    .is_none()
                {
                    repository.save(invoice).await.into_diagnostic()?;
                } else {
                    tracing::debug!(reference = invoice.reference(), "invoice already registered");
                }
            }
            Err(e) => {
                eprintln!("Error reading invoice: {}", e);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let repository = open_repository(cli.db_path)?;
    if let Some(invoices) = cli.invoices {
        register_invoices(repository.as_ref(), invoices).await?;
    }
    let processor = PaymentProcessor::new(repository);

    let stdout = io::stdout();
    let mut outcomes = OutcomeWriter::new(stdout.lock());

    // Process payments
    let file = File::open(cli.payments).into_diagnostic()?;
    let reader = PaymentReader::new(file);
    for payment_result in reader.payments() {
        match payment_result {
            Ok(payment) => match processor.process(payment.clone()).await {
                Ok(outcome) => {
                    if let Report::Outcomes = cli.report {
                        outcomes.write_outcome(&payment, outcome).into_diagnostic()?;
                    }
                }
                Err(e) => {
                    eprintln!("Error processing payment for {}: {}", payment.reference, e);
                }
            },
            Err(e) => {
                eprintln!("Error reading payment: {}", e);
            }
        }
    }
    outcomes.flush().into_diagnostic()?;
    drop(outcomes);

    if let Report::Invoices = cli.report {
        let invoices = processor.into_results().await.into_diagnostic()?;
        let mut writer = InvoiceWriter::new(stdout.lock());
        writer.write_invoices(invoices).into_diagnostic()?;
    }

    Ok(())
}
