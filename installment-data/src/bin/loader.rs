use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use installment_core::SimulationStore;
use installment_core::db::{DEFAULT_NAMESPACE, DbConfig, RepositoryRegistry};
use installment_data::DraftLoader;
use installment_db_sqlite::SqliteRepositoryFactory;
use tracing_subscriber::EnvFilter;

/// Import simulation drafts from a CSV file into the saved history.
///
/// The CSV file should have the following columns:
/// - product_name: What is being bought
/// - price: Total price
/// - store: Where it is being bought
/// - category: One of the calculator's category codes (e.g. electronics)
/// - installment_count: Number of monthly installments (at least 1)
/// - interest_rate: Annual interest rate in percent (optional)
#[derive(Parser, Debug)]
#[command(name = "installment-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the drafts
    #[arg(short, long)]
    file: PathBuf,

    /// Storage backend (`file` or `sqlite`)
    #[arg(short, long, default_value = "file")]
    backend: String,

    /// Backend location: a directory for `file`, a database path for `sqlite`
    #[arg(short, long, default_value = "./data")]
    db: String,

    /// Key the history is stored under
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Parse and validate the file without saving anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn")),
        )
        .without_time()
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("Loading drafts from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let drafts = DraftLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} drafts from CSV", drafts.len());

    if args.dry_run {
        println!("Dry run, nothing saved.");
        return Ok(());
    }

    let mut registry = RepositoryRegistry::with_builtin_backends();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig {
        backend: args.backend,
        connection_string: args.db,
        namespace: args.namespace,
    };
    let repo = registry
        .create(&config)
        .with_context(|| format!("Failed to open {} storage", config.backend))?;
    let mut store = SimulationStore::open(repo);

    let inserted = DraftLoader::load(&mut store, &drafts)
        .context("Failed to save drafts into the history")?;

    println!(
        "Successfully added {} simulations ({} in history).",
        inserted,
        store.len()
    );

    Ok(())
}
