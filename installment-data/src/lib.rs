mod export;
mod loader;

pub use export::{ScheduleExporter, ScheduleRow};
pub use loader::{DraftLoader, DraftLoaderError};
