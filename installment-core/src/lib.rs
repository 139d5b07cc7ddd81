pub mod calculations;
pub mod db;
pub mod models;
pub mod store;

pub use calculations::{ScheduleTotals, calculate_discount, monthly_rate};
pub use db::repository::{RepositoryError, SimulationRepository};
pub use models::*;
pub use store::{SimulationStore, StoreError, validate_draft};
