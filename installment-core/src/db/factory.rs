use std::collections::HashMap;

use super::file::FileRepository;
use super::memory::MemoryRepository;
use super::repository::{RepositoryError, SimulationRepository};

/// Key under which the simulation history is stored unless configured
/// otherwise.
pub const DEFAULT_NAMESPACE: &str = "nubank-calculator-storage";

/// Backend-agnostic storage configuration.
///
/// `backend` must match the [`RepositoryFactory::backend_name`] of a
/// registered factory.  `connection_string` is passed through to that
/// factory unchanged; its meaning is entirely backend-specific.
///
/// | backend    | connection_string examples          |
/// |------------|-------------------------------------|
/// | `memory`   | ignored                             |
/// | `file`     | `./data`, `/var/lib/calc`           |
/// | `sqlite`   | `simulations.db`, `:memory:`        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"file"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub connection_string: String,
    /// Key of the slot holding the collection inside the backend.
    pub namespace: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// One implementation per storage backend.  Each backend exports a single
/// unit struct that implements this trait and is registered with a
/// [`RepositoryRegistry`] at startup.
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Open (or create) the backing store and return a ready-to-use
    /// repository.
    fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError>;
}

/// [`RepositoryFactory`] for the in-process [`MemoryRepository`].
pub struct MemoryRepositoryFactory;

impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}

/// [`RepositoryFactory`] for [`FileRepository`]; `connection_string` is the
/// directory holding the payload file.
pub struct FileRepositoryFactory;

impl RepositoryFactory for FileRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        if config.connection_string.trim().is_empty() {
            return Err(RepositoryError::Configuration(
                "file backend needs a directory as connection string".to_string(),
            ));
        }
        Ok(Box::new(FileRepository::new(
            &config.connection_string,
            &config.namespace,
        )))
    }
}

/// Registry of [`RepositoryFactory`] instances, keyed by backend name.
///
/// Typical lifetime:
/// 1. Create with `RepositoryRegistry::with_builtin_backends()`.
/// 2. Call `register` once per additional backend.
/// 3. Call `create` whenever a new repository is needed.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the `memory` and `file` backends that ship with
    /// this crate.
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MemoryRepositoryFactory));
        registry.register(Box::new(FileRepositoryFactory));
        registry
    }

    /// Register a backend factory.
    ///
    /// If a factory with the same [`RepositoryFactory::backend_name`] is
    /// already present it is silently replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory that matches `config.backend` and return
    /// the repository it produces.
    ///
    /// # Errors
    /// * [`RepositoryError::Configuration`]: no factory is registered for
    ///   the requested backend name.
    /// * Any error the chosen factory itself returns.
    pub fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config)
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
