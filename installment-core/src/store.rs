//! The saved-simulation history.
//!
//! [`SimulationStore`] owns the collection in memory and is the only way to
//! change it. Every add or update goes through the discount engine, so the
//! stored `results` always match the stored inputs, and every mutation is
//! flushed to the [`SimulationRepository`] the store was opened with.
//!
//! Construct one store at startup and hand it to whatever needs it:
//!
//! ```
//! use installment_core::db::MemoryRepository;
//! use installment_core::{Category, SimulationDraft, SimulationStore};
//!
//! let mut store = SimulationStore::open(Box::new(MemoryRepository::new()));
//! let draft = SimulationDraft::new("Notebook", 4800.0, "Loja", Category::Electronics, 12, 10.58);
//!
//! let id = store.add(draft).unwrap().id.clone();
//! assert_eq!(store.get(&id).map(|s| s.results.len()), Some(12));
//!
//! assert!(store.delete(&id).unwrap());
//! assert!(store.is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::calculate_discount;
use crate::db::repository::{RepositoryError, SimulationRepository};
use crate::models::{InstallmentResult, Simulation, SimulationDraft, SimulationId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("simulation '{0}' not found")]
    NotFound(SimulationId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Rejects inputs the discount engine cannot turn into a meaningful schedule.
///
/// A rate at or below -100% has no effective monthly equivalent: the
/// discount factors become infinite or NaN, which the persisted layout
/// cannot represent.
pub fn validate_draft(draft: &SimulationDraft) -> Result<(), StoreError> {
    if draft.installment_count < 1 {
        return Err(StoreError::InvalidInput(
            "installment count must be at least 1".to_string(),
        ));
    }
    if !draft.price.is_finite() {
        return Err(StoreError::InvalidInput(format!(
            "price must be a finite number, got {}",
            draft.price
        )));
    }
    if !draft.interest_rate.is_finite() {
        return Err(StoreError::InvalidInput(format!(
            "interest rate must be a finite number, got {}",
            draft.interest_rate
        )));
    }
    if draft.interest_rate <= -100.0 {
        return Err(StoreError::InvalidInput(format!(
            "interest rate must be greater than -100%, got {}",
            draft.interest_rate
        )));
    }
    Ok(())
}

pub struct SimulationStore {
    repo: Box<dyn SimulationRepository>,
    simulations: Vec<Simulation>,
}

impl SimulationStore {
    /// Loads the saved collection from `repo`.
    ///
    /// Opening never fails: an unreadable or malformed payload is logged and
    /// treated as an empty history. Loaded results are recomputed, and
    /// entries repeating an earlier id are dropped.
    pub fn open(repo: Box<dyn SimulationRepository>) -> Self {
        let loaded = match repo.load() {
            Ok(simulations) => simulations,
            Err(error) => {
                warn!(%error, "discarding unreadable simulation history");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        let simulations: Vec<Simulation> = loaded
            .into_iter()
            .filter(|sim| {
                let fresh = seen.insert(sim.id.clone());
                if !fresh {
                    warn!(id = %sim.id, "dropping simulation with duplicate id");
                }
                fresh
            })
            .map(Simulation::recomputed)
            .collect();

        info!(count = simulations.len(), "simulation history loaded");
        Self { repo, simulations }
    }

    /// All simulations in insertion order.
    pub fn list(&self) -> &[Simulation] {
        &self.simulations
    }

    pub fn get(
        &self,
        id: &SimulationId,
    ) -> Option<&Simulation> {
        self.simulations.iter().find(|sim| &sim.id == id)
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Computes the schedule `draft` would get, without saving anything.
    pub fn preview(
        &self,
        draft: &SimulationDraft,
    ) -> Result<Vec<InstallmentResult>, StoreError> {
        validate_draft(draft)?;
        Ok(calculate_discount(
            draft.price,
            draft.installment_count,
            draft.interest_rate,
        ))
    }

    /// Saves `draft` as a new simulation under a freshly minted id.
    ///
    /// # Errors
    /// * [`StoreError::InvalidInput`]: the draft fails validation; nothing
    ///   changes.
    /// * [`StoreError::Repository`]: the collection could not be flushed.
    ///   The simulation stays in memory.
    pub fn add(
        &mut self,
        draft: SimulationDraft,
    ) -> Result<&Simulation, StoreError> {
        validate_draft(&draft)?;

        let id = self.mint_id();
        let simulation = Simulation::from_draft(id, draft);
        info!(id = %simulation.id, product = %simulation.product_name, "simulation added");

        let index = self.simulations.len();
        self.simulations.push(simulation);
        self.persist()?;
        Ok(&self.simulations[index])
    }

    /// Replaces the simulation with the same id, keeping its position.
    ///
    /// Every input field is taken from `simulation`; its `results` are
    /// ignored and recomputed.
    ///
    /// # Errors
    /// * [`StoreError::NotFound`]: no simulation has that id.
    /// * [`StoreError::InvalidInput`]: the new inputs fail validation.
    /// * [`StoreError::Repository`]: the collection could not be flushed.
    ///   The update stays in memory.
    pub fn update(
        &mut self,
        simulation: Simulation,
    ) -> Result<&Simulation, StoreError> {
        let (id, draft) = simulation.into_parts();

        let index = self
            .position(&id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        validate_draft(&draft)?;

        self.simulations[index] = Simulation::from_draft(id, draft);
        info!(id = %self.simulations[index].id, "simulation updated");

        self.persist()?;
        Ok(&self.simulations[index])
    }

    /// Removes the simulation with `id`.
    ///
    /// Returns `Ok(false)` without touching storage when the id is unknown,
    /// so deleting twice is harmless.
    pub fn delete(
        &mut self,
        id: &SimulationId,
    ) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete ignored, simulation not found");
            return Ok(false);
        };

        self.simulations.remove(index);
        info!(%id, "simulation deleted");

        self.persist()?;
        Ok(true)
    }

    fn position(
        &self,
        id: &SimulationId,
    ) -> Option<usize> {
        self.simulations.iter().position(|sim| &sim.id == id)
    }

    fn mint_id(&self) -> SimulationId {
        loop {
            let id = SimulationId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.repo.save(&self.simulations)?;
        Ok(())
    }
}
