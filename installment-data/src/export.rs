use std::io::Write;

use installment_core::Simulation;
use serde::Serialize;

/// One installment of one simulation, flattened for spreadsheets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleRow<'a> {
    pub simulation_id: &'a str,
    pub product_name: &'a str,
    pub store: &'a str,
    pub category: &'a str,
    pub installment_index: u32,
    pub original_value: f64,
    pub discounted_value: f64,
    pub discount: f64,
}

/// Writes discount schedules as CSV, one row per installment.
pub struct ScheduleExporter;

impl ScheduleExporter {
    /// Writes a header and the schedules of `simulations` in collection
    /// order. Returns the number of data rows written.
    pub fn write<W: Write>(
        writer: W,
        simulations: &[Simulation],
    ) -> Result<usize, csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut written = 0;

        for sim in simulations {
            for result in &sim.results {
                csv_writer.serialize(ScheduleRow {
                    simulation_id: sim.id.as_str(),
                    product_name: &sim.product_name,
                    store: &sim.store,
                    category: &sim.category,
                    installment_index: result.installment_index,
                    original_value: result.original_value,
                    discounted_value: result.discounted_value,
                    discount: result.discount,
                })?;
                written += 1;
            }
        }

        csv_writer.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use installment_core::{Category, SimulationDraft};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn writes_one_row_per_installment_with_header() {
        let sims = vec![
            Simulation::from_draft(
                "a".into(),
                SimulationDraft::new("Chair", 300.0, "Loja", Category::Home, 3, 0.0),
            ),
            Simulation::from_draft(
                "b".into(),
                SimulationDraft::new("Lamp", 50.0, "Loja", Category::Home, 1, 0.0),
            ),
        ];
        let mut out = Vec::new();

        let written = ScheduleExporter::write(&mut out, &sims).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(written, 4);
        assert_eq!(
            lines[0],
            "simulation_id,product_name,store,category,installment_index,original_value,discounted_value,discount"
        );
        assert_eq!(lines[1], "a,Chair,Loja,home,1,100.0,100.0,0.0");
        assert_eq!(lines[4], "b,Lamp,Loja,home,1,50.0,50.0,0.0");
    }

    #[test]
    fn empty_collection_writes_nothing() {
        let mut out = Vec::new();

        assert_eq!(ScheduleExporter::write(&mut out, &[]).unwrap(), 0);
        assert!(out.is_empty());
    }
}
