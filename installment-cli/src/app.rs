use anyhow::{Context, Result};
use installment_core::SimulationStore;
use installment_core::db::{DbConfig, RepositoryRegistry};
use installment_db_sqlite::SqliteRepositoryFactory;
use tracing::debug;

/// Registry with every backend this binary ships: `memory`, `file` and
/// `sqlite`.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::with_builtin_backends();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Opens the configured backend and loads the saved history from it.
pub fn open_store(config: &DbConfig) -> Result<SimulationStore> {
    debug!(
        backend = %config.backend,
        location = %config.connection_string,
        namespace = %config.namespace,
        "opening simulation history"
    );

    let repo = build_registry()
        .create(config)
        .with_context(|| format!("Failed to open {} storage", config.backend))?;

    Ok(SimulationStore::open(repo))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_knows_all_shipped_backends() {
        assert_eq!(
            build_registry().available_backends(),
            vec!["file", "memory", "sqlite"]
        );
    }

    #[test]
    fn open_store_rejects_unknown_backend() {
        let config = DbConfig {
            backend: "postgres".to_string(),
            ..DbConfig::default()
        };

        let err = open_store(&config).err().unwrap();

        assert!(format!("{err:#}").contains("unknown backend 'postgres'"));
    }

    #[test]
    fn open_store_on_sqlite_memory_starts_empty() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
            ..DbConfig::default()
        };

        let store = open_store(&config).unwrap();

        assert!(store.is_empty());
    }
}
