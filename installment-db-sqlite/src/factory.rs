use installment_core::db::{DbConfig, RepositoryFactory};
use installment_core::{RepositoryError, SimulationRepository};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`installment_core::db::RepositoryRegistry`] to make
/// the `"sqlite"` backend available:
///
/// ```rust,no_run
/// use installment_core::db::RepositoryRegistry;
/// use installment_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::with_builtin_backends();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"simulations.db"`.  The file is created if
    ///   it does not exist.
    /// * `":memory:"`: an ephemeral in-memory database (useful for tests).
    fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string, &config.namespace)
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .map_err(|e| RepositoryError::Storage(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
