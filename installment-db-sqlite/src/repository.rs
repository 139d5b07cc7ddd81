use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use installment_core::db::{decode, encode};
use installment_core::{RepositoryError, Simulation, SimulationRepository};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::runtime::Runtime;
use tracing::debug;

const CREATE_KV_STORE: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
)";

/// Key-value slot in a SQLite database.
///
/// The collection is stored as one JSON payload in the `kv_store` row keyed
/// by the namespace. sqlx is async, so the repository drives it from a
/// private current-thread runtime and exposes the synchronous
/// [`SimulationRepository`] interface.
pub struct SqliteRepository {
    pool: SqlitePool,
    namespace: String,
    runtime: Runtime,
}

impl SqliteRepository {
    /// Opens (creating if needed) the database at `database_url`.
    ///
    /// Accepts a bare file path, a `sqlite:` URL, or `:memory:`. The pool
    /// holds a single connection that is never recycled, which keeps an
    /// in-memory database alive for the lifetime of the repository.
    pub fn new(
        database_url: &str,
        namespace: &str,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start the SQLite runtime")?;

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database location: {}", database_url))?
            .create_if_missing(true);

        let pool = runtime
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
                    .connect_with(options),
            )
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        Ok(Self {
            pool,
            namespace: namespace.to_string(),
            runtime,
        })
    }

    /// Creates the `kv_store` table if it does not exist yet.
    pub fn run_migrations(&self) -> Result<()> {
        self.runtime
            .block_on(sqlx::query(CREATE_KV_STORE).execute(&self.pool))
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn read_payload(&self) -> Result<Option<String>, RepositoryError> {
        let row = self
            .runtime
            .block_on(
                sqlx::query("SELECT value FROM kv_store WHERE key = ?")
                    .bind(self.namespace.as_str())
                    .fetch_optional(&self.pool),
            )
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("value")
                .map_err(|e| RepositoryError::Storage(e.to_string()))
        })
        .transpose()
    }
}

impl SimulationRepository for SqliteRepository {
    fn load(&self) -> Result<Vec<Simulation>, RepositoryError> {
        match self.read_payload()? {
            Some(payload) => decode(&payload),
            None => {
                debug!(namespace = %self.namespace, "no saved simulations yet");
                Ok(Vec::new())
            }
        }
    }

    fn save(
        &self,
        simulations: &[Simulation],
    ) -> Result<(), RepositoryError> {
        let payload = encode(simulations)?;

        self.runtime
            .block_on(
                sqlx::query(
                    "INSERT INTO kv_store (key, value) VALUES (?, ?)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                )
                .bind(self.namespace.as_str())
                .bind(payload)
                .execute(&self.pool),
            )
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        debug!(namespace = %self.namespace, count = simulations.len(), "saved simulations");
        Ok(())
    }
}

impl Drop for SqliteRepository {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}
