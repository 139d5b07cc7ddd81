//! Application configuration.
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults ([`AppConfig::default`]).
//! 2. A TOML file: the `--config` path, or `installment-calc.toml` in the
//!    working directory when it exists.
//! 3. Command-line flags ([`Overrides`]).
//!
//! ```toml
//! backend = "sqlite"
//! connection_string = "simulations.db"
//! namespace = "nubank-calculator-storage"
//! log_level = "debug"
//! log_file = "installment-calc.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use installment_core::db::{DEFAULT_NAMESPACE, DbConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "installment-calc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Storage backend name (`file`, `sqlite` or `memory`).
    pub backend: String,
    /// Backend location, forwarded to the backend factory.
    pub connection_string: String,
    /// Key the history is stored under.
    pub namespace: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Also append log records to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            connection_string: "./data".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Values given on the command line. `None` leaves the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub backend: Option<String>,
    pub db: Option<String>,
    pub namespace: Option<String>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads `explicit` if given (it must exist), otherwise the default
    /// config file if present, otherwise the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            debug!(path = %default_path.display(), "using config file");
            return Self::load(default_path);
        }

        Ok(Self::default())
    }

    pub fn with_overrides(
        mut self,
        overrides: Overrides,
    ) -> Self {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(db) = overrides.db {
            self.connection_string = db;
        }
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        self
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.backend.clone(),
            connection_string: self.connection_string.clone(),
            namespace: self.namespace.clone(),
        }
    }
}
