use thiserror::Error;

use crate::models::Simulation;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Durable slot holding the whole simulation collection.
///
/// Every backend keeps exactly one payload per namespace. `load` returns an
/// empty collection when nothing has been saved yet; a payload that exists
/// but cannot be decoded is reported as [`RepositoryError::Malformed`] and
/// it is up to the caller to decide whether to discard it.
pub trait SimulationRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Simulation>, RepositoryError>;

    /// Replaces the stored collection with `simulations`.
    fn save(
        &self,
        simulations: &[Simulation],
    ) -> Result<(), RepositoryError>;
}
