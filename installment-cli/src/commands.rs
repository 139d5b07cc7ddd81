use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use installment_core::{
    Category, DEFAULT_INTEREST_RATE, SimulationDraft, SimulationId, SimulationStore, StoreError,
};
use installment_data::ScheduleExporter;
use tracing::debug;

use crate::utils::{format_brl, format_rate, parse_amount};
use crate::views::{HistoryTable, ScheduleTable, SimulationDetails};

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| {
        let codes: Vec<&str> = Category::all().iter().map(Category::as_str).collect();
        format!("unknown category '{s}'; expected one of: {}", codes.join(", "))
    })
}

/// Inputs of a new simulation.
#[derive(Debug, Clone, Args)]
pub struct DraftArgs {
    /// What is being bought
    #[arg(short, long)]
    pub product: String,

    /// Total price, e.g. `1234.56` or `1.234,56`
    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub price: f64,

    /// Where it is being bought
    #[arg(short, long, default_value = "")]
    pub store: String,

    /// Category code (see `categories`)
    #[arg(short, long, value_parser = parse_category, default_value = "other")]
    pub category: Category,

    /// Number of monthly installments
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub installments: u32,

    /// Annual interest rate in percent
    #[arg(short, long, value_parser = parse_amount, default_value_t = DEFAULT_INTEREST_RATE)]
    pub rate: f64,
}

impl DraftArgs {
    fn into_draft(self) -> SimulationDraft {
        SimulationDraft::new(
            self.product,
            self.price,
            self.store,
            self.category,
            self.installments,
            self.rate,
        )
    }
}

/// Fields to change on a saved simulation. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Args)]
pub struct UpdateArgs {
    #[arg(short, long)]
    pub product: Option<String>,

    #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
    pub price: Option<f64>,

    #[arg(short, long)]
    pub store: Option<String>,

    #[arg(short, long, value_parser = parse_category)]
    pub category: Option<Category>,

    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub installments: Option<u32>,

    #[arg(short, long, value_parser = parse_amount)]
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the discount schedule for a purchase without saving it
    Preview(DraftArgs),

    /// Save a simulation to the history
    Add(DraftArgs),

    /// List saved simulations
    List,

    /// Show one saved simulation with its schedule
    Show { id: String },

    /// Change fields of a saved simulation and recompute its schedule
    Update {
        id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Remove a saved simulation
    Delete { id: String },

    /// Write every saved schedule as CSV (`-` for stdout)
    Export { path: PathBuf },

    /// List the available category codes
    Categories,
}

/// Runs `command` against `store`, writing human-readable output to `out`.
pub fn execute(
    command: Command,
    store: &mut SimulationStore,
    out: &mut dyn Write,
) -> Result<()> {
    debug!(?command, "executing");

    match command {
        Command::Preview(args) => {
            let draft = args.into_draft();
            let results = store.preview(&draft)?;
            writeln!(
                out,
                "{} in {}x at {}",
                format_brl(draft.price),
                draft.installment_count,
                format_rate(draft.interest_rate)
            )?;
            write!(out, "{}", ScheduleTable(&results))?;
        }
        Command::Add(args) => {
            let saved = store.add(args.into_draft())?;
            writeln!(out, "Saved simulation {}", saved.id)?;
            write!(out, "{}", SimulationDetails(saved))?;
        }
        Command::List => {
            write!(out, "{}", HistoryTable(store.list()))?;
        }
        Command::Show { id } => {
            let id = SimulationId::from(id);
            let sim = store.get(&id).ok_or(StoreError::NotFound(id))?;
            write!(out, "{}", SimulationDetails(sim))?;
        }
        Command::Update { id, fields } => {
            let id = SimulationId::from(id);
            let mut sim = store
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound(id))?;

            if let Some(product) = fields.product {
                sim.product_name = product;
            }
            if let Some(price) = fields.price {
                sim.price = price;
            }
            if let Some(shop) = fields.store {
                sim.store = shop;
            }
            if let Some(category) = fields.category {
                sim.category = category.as_str().to_string();
            }
            if let Some(installments) = fields.installments {
                sim.installment_count = installments;
            }
            if let Some(rate) = fields.rate {
                sim.interest_rate = rate;
            }

            let updated = store.update(sim)?;
            writeln!(out, "Updated simulation {}", updated.id)?;
            write!(out, "{}", SimulationDetails(updated))?;
        }
        Command::Delete { id } => {
            let id = SimulationId::from(id);
            if store.delete(&id)? {
                writeln!(out, "Deleted simulation {id}")?;
            } else {
                writeln!(out, "No simulation with id {id}")?;
            }
        }
        Command::Export { path } => {
            let rows = if path.as_os_str() == "-" {
                ScheduleExporter::write(&mut *out, store.list())?
            } else {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let rows = ScheduleExporter::write(BufWriter::new(file), store.list())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                writeln!(out, "Exported {rows} rows to {}", path.display())?;
                rows
            };
            debug!(rows, "schedules exported");
        }
        Command::Categories => {
            for category in Category::all() {
                writeln!(out, "{:<14} {}", category.as_str(), category.label())?;
            }
        }
    }

    Ok(())
}
