use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{ScheduleTotals, calculate_discount};
use crate::models::{Category, InstallmentResult};

/// Annual interest rate (percent) the calculator starts with.
pub const DEFAULT_INTEREST_RATE: f64 = 10.58;

/// Opaque simulation identifier.
///
/// New ids are UUID v4 strings, but any string found in previously saved
/// data is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(String);

impl SimulationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SimulationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SimulationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SimulationId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved simulation.
///
/// `results` is derived from `price`, `installment_count` and
/// `interest_rate`; the store recomputes it on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: SimulationId,
    pub product_name: String,
    pub price: f64,
    pub store: String,
    pub category: String,
    #[serde(alias = "installments")]
    pub installment_count: u32,
    pub interest_rate: f64,
    #[serde(default)]
    pub results: Vec<InstallmentResult>,
}

/// Simulation inputs before an id is minted and results are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDraft {
    pub product_name: String,
    pub price: f64,
    pub store: String,
    pub category: String,
    pub installment_count: u32,
    pub interest_rate: f64,
}

impl SimulationDraft {
    /// Builds a draft whose category comes from the closed [`Category`] set.
    pub fn new(
        product_name: impl Into<String>,
        price: f64,
        store: impl Into<String>,
        category: Category,
        installment_count: u32,
        interest_rate: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            price,
            store: store.into(),
            category: category.as_str().to_string(),
            installment_count,
            interest_rate,
        }
    }
}

impl Simulation {
    /// Materializes a draft under `id`, computing its discount schedule.
    pub fn from_draft(
        id: SimulationId,
        draft: SimulationDraft,
    ) -> Self {
        let results = calculate_discount(draft.price, draft.installment_count, draft.interest_rate);
        Self {
            id,
            product_name: draft.product_name,
            price: draft.price,
            store: draft.store,
            category: draft.category,
            installment_count: draft.installment_count,
            interest_rate: draft.interest_rate,
            results,
        }
    }

    /// Splits the simulation back into its id and inputs. Any results are
    /// discarded.
    pub fn into_parts(self) -> (SimulationId, SimulationDraft) {
        let draft = SimulationDraft {
            product_name: self.product_name,
            price: self.price,
            store: self.store,
            category: self.category,
            installment_count: self.installment_count,
            interest_rate: self.interest_rate,
        };
        (self.id, draft)
    }

    /// Rebuilds `results` from the current inputs.
    pub fn recomputed(self) -> Self {
        let (id, draft) = self.into_parts();
        Self::from_draft(id, draft)
    }

    /// The stored category, if it belongs to the known set.
    pub fn category_kind(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn totals(&self) -> ScheduleTotals {
        ScheduleTotals::from_results(&self.results)
    }
}
