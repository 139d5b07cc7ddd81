use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::repository::{RepositoryError, SimulationRepository};
use super::state::{decode, encode};
use crate::models::Simulation;

/// Stores the collection as `<dir>/<namespace>.json`.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write leaves the previous payload intact.
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
}

impl FileRepository {
    pub fn new(
        dir: impl AsRef<Path>,
        namespace: &str,
    ) -> Self {
        Self {
            path: dir.as_ref().join(format!("{namespace}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SimulationRepository for FileRepository {
    fn load(&self) -> Result<Vec<Simulation>, RepositoryError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => decode(&payload),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved simulations yet");
                Ok(Vec::new())
            }
            Err(e) => Err(RepositoryError::Storage(format!(
                "cannot read '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn save(
        &self,
        simulations: &[Simulation],
    ) -> Result<(), RepositoryError> {
        let payload = encode(simulations)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                RepositoryError::Storage(format!("cannot create '{}': {e}", dir.display()))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|e| {
            RepositoryError::Storage(format!("cannot write '{}': {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            RepositoryError::Storage(format!("cannot replace '{}': {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), count = simulations.len(), "saved simulations");
        Ok(())
    }
}
