mod category;
mod installment_result;
mod simulation;

pub use category::Category;
pub use installment_result::InstallmentResult;
pub use simulation::{DEFAULT_INTEREST_RATE, Simulation, SimulationDraft, SimulationId};
