use std::sync::{Mutex, MutexGuard};

use super::repository::{RepositoryError, SimulationRepository};
use super::state::{decode, encode};
use crate::models::Simulation;

/// In-process slot. Payloads are kept in their serialized form so that a
/// save followed by a load exercises the same encoding as the durable
/// backends.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    slot: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `payload` already in the slot, whether or not it decodes.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
        }
    }

    /// The raw payload currently stored, if any.
    pub fn payload(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>, RepositoryError> {
        self.slot
            .lock()
            .map_err(|e| RepositoryError::Storage(e.to_string()))
    }
}

impl SimulationRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Simulation>, RepositoryError> {
        match self.lock()?.as_deref() {
            Some(payload) => decode(payload),
            None => Ok(Vec::new()),
        }
    }

    fn save(
        &self,
        simulations: &[Simulation],
    ) -> Result<(), RepositoryError> {
        let payload = encode(simulations)?;
        *self.lock()? = Some(payload);
        Ok(())
    }
}
