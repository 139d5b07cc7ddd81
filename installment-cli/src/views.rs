//! Plain-text renderings of schedules and saved simulations.

use std::fmt;

use installment_core::{InstallmentResult, ScheduleTotals, Simulation};

use crate::utils::{format_brl, format_rate};

/// Stored category rendered with its label when it is a known code.
fn category_label(sim: &Simulation) -> &str {
    sim.category_kind()
        .map(|category| category.label())
        .unwrap_or(sim.category.as_str())
}

/// Installment-by-installment discount table with a totals footer.
pub struct ScheduleTable<'a>(pub &'a [InstallmentResult]);

impl fmt::Display for ScheduleTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>4}  {:>16}  {:>16}  {:>14}",
            "#", "Installment", "Present value", "Discount"
        )?;
        for row in self.0 {
            writeln!(
                f,
                "{:>4}  {:>16}  {:>16}  {:>14}",
                row.installment_index,
                format_brl(row.original_value),
                format_brl(row.discounted_value),
                format_brl(row.discount)
            )?;
        }

        let totals = ScheduleTotals::from_results(self.0);
        writeln!(
            f,
            "{:>4}  {:>16}  {:>16}  {:>14}",
            "Σ",
            format_brl(totals.total_original),
            format_brl(totals.total_discounted),
            format_brl(totals.total_discount)
        )
    }
}

/// Full view of one saved simulation.
pub struct SimulationDetails<'a>(pub &'a Simulation);

impl fmt::Display for SimulationDetails<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let sim = self.0;
        writeln!(f, "Id:            {}", sim.id)?;
        writeln!(f, "Product:       {}", sim.product_name)?;
        writeln!(f, "Store:         {}", sim.store)?;
        writeln!(f, "Category:      {}", category_label(sim))?;
        writeln!(f, "Price:         {}", format_brl(sim.price))?;
        writeln!(f, "Installments:  {}", sim.installment_count)?;
        writeln!(f, "Interest rate: {} a.a.", format_rate(sim.interest_rate))?;
        writeln!(f)?;
        write!(f, "{}", ScheduleTable(&sim.results))
    }
}

/// One line per saved simulation.
pub struct HistoryTable<'a>(pub &'a [Simulation]);

impl fmt::Display for HistoryTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No saved simulations.");
        }

        writeln!(
            f,
            "{:<36}  {:<24}  {:<16}  {:>16}  {:>3}  {:>7}  {:>14}",
            "Id", "Product", "Category", "Price", "N", "Rate", "Discount"
        )?;
        for sim in self.0 {
            writeln!(
                f,
                "{:<36}  {:<24}  {:<16}  {:>16}  {:>3}  {:>7}  {:>14}",
                sim.id.as_str(),
                sim.product_name,
                category_label(sim),
                format_brl(sim.price),
                sim.installment_count,
                format_rate(sim.interest_rate),
                format_brl(sim.totals().total_discount)
            )?;
        }
        Ok(())
    }
}
