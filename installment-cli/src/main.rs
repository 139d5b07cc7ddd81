use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use installment_cli::config::{AppConfig, Overrides};
use installment_cli::commands::{self, Command};
use installment_cli::{app, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Installment purchase calculator.
///
/// Shows how much each installment of a purchase is worth today at a given
/// annual interest rate, and keeps a history of saved simulations.
#[derive(Debug, Parser)]
#[command(name = "installment-calc", version)]
struct Cli {
    /// TOML config file [default: ./installment-calc.toml if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend: `file`, `sqlite` or `memory`
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Backend location: a directory for `file`, a database path for `sqlite`
    #[arg(long, global = true)]
    db: Option<String>,

    /// Key the history is stored under
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Log at debug level (overrides the configured level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(if cli.verbose { "debug" } else { "warn" });

    let config = AppConfig::resolve(cli.config.as_deref())?.with_overrides(Overrides {
        backend: cli.backend,
        db: cli.db,
        namespace: cli.namespace,
    });

    if !cli.verbose && !logging::env_filter_present() {
        if let Err(error) = logging::set_log_level(&config.log_level) {
            warn!(%error, "keeping default log level");
        }
    }
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    debug!(?config, "configuration resolved");

    let mut store = app::open_store(&config.db_config())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::execute(cli.command, &mut store, &mut out)?;
    out.flush().context("Failed to write output")?;

    Ok(())
}
