//! Server configuration
//!
//! Three layers, later ones win:
//! - Defaults (`ServerConfig::default()`): in-memory store, rule-based scoring, port 3000
//! - YAML file (schema v1, see `io::ConfigFileV1`)
//! - Environment variables (`PORT`, `DIABSCREEN_*`)
//!
//! # Examples
//!
//! ```rust,ignore
//! use diabscreen_core::config::ServerConfig;
//!
//! // File + process environment, validated
//! let config = ServerConfig::load(Some("diabscreen.yaml".as_ref()))?;
//! println!("{}", config.provenance().summary());
//! ```

pub mod error;
pub mod io;
pub mod provenance;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::classifier::ScoringStrategy;

pub use error::{ConfigError, ConfigResult};
pub use io::{AdminSection, ConfigFileV1, HttpSection, StoreSection};
pub use provenance::{ConfigProvenance, ConfigSource};
pub use validation::Validatable;

pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "DIABSCREEN_HOST";
pub const ENV_STRATEGY: &str = "DIABSCREEN_STRATEGY";
pub const ENV_STORE: &str = "DIABSCREEN_STORE";
pub const ENV_DB_PATH: &str = "DIABSCREEN_DB_PATH";
pub const ENV_STATIC_DIR: &str = "DIABSCREEN_STATIC_DIR";

// ═══════════════════════════════════════════════════════════════════════════
// Sections
// ═══════════════════════════════════════════════════════════════════════════

/// Data store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Seeded in-process tables, lost on restart
    Memory,
    /// SQLite file (or `:memory:`)
    Sqlite,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::Memory
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mock" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(format!(
                "Unknown store backend '{}'. Valid backends: memory, sqlite",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for paths no API route claims
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
        }
    }
}

impl HttpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ServerConfig
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    pub strategy: ScoringStrategy,
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub admin: AdminConfig,
    provenance: ConfigProvenance,
}

impl ServerConfig {
    /// Defaults, then the optional YAML file, then the process environment.
    /// The result is validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// Parse YAML content (v1 schema)
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Self::parse_yaml(content, "<inline>")
    }

    fn parse_yaml(content: &str, origin: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        let source = || ConfigSource::Yaml {
            path: origin.to_string(),
        };

        if let Some(strategy) = file.strategy {
            config.strategy = strategy;
            config.provenance.track_field("strategy", source());
        }

        if let Some(http) = file.http {
            if let Some(host) = http.host {
                config.http.host = host;
                config.provenance.track_field("http.host", source());
            }
            if let Some(port) = http.port {
                config.http.port = port;
                config.provenance.track_field("http.port", source());
            }
            if let Some(dir) = http.static_dir {
                config.http.static_dir = Some(dir);
                config.provenance.track_field("http.static_dir", source());
            }
        }

        if let Some(store) = file.store {
            if let Some(backend) = store.backend {
                config.store.backend = backend;
                config.provenance.track_field("store.backend", source());
            }
            if let Some(path) = store.path {
                config.store.path = Some(path);
                config.provenance.track_field("store.path", source());
            }
        }

        if let Some(admin) = file.admin {
            if let Some(username) = admin.username {
                config.admin.username = username;
                config.provenance.track_field("admin.username", source());
            }
            if let Some(password) = admin.password {
                config.admin.password = password;
                config.provenance.track_field("admin.password", source());
            }
        }

        debug!(origin, "loaded configuration file");
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (key → value)
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |var: &str| ConfigSource::Env(var.to_string());

        if let Some(value) = lookup(ENV_PORT) {
            self.http.port = value.trim().parse().map_err(|_| {
                ConfigError::invalid_value("http.port", &value, "Expected a port number 1..=65535")
            })?;
            self.provenance.track_field("http.port", env(ENV_PORT));
        }

        if let Some(value) = lookup(ENV_HOST) {
            self.http.host = value;
            self.provenance.track_field("http.host", env(ENV_HOST));
        }

        if let Some(value) = lookup(ENV_STRATEGY) {
            self.strategy = value
                .parse()
                .map_err(|hint: String| ConfigError::invalid_value("strategy", &value, hint))?;
            self.provenance.track_field("strategy", env(ENV_STRATEGY));
        }

        if let Some(value) = lookup(ENV_STORE) {
            self.store.backend = value
                .parse()
                .map_err(|hint: String| ConfigError::invalid_value("store.backend", &value, hint))?;
            self.provenance.track_field("store.backend", env(ENV_STORE));
        }

        if let Some(value) = lookup(ENV_DB_PATH) {
            self.store.path = Some(PathBuf::from(value));
            self.provenance.track_field("store.path", env(ENV_DB_PATH));
        }

        if let Some(value) = lookup(ENV_STATIC_DIR) {
            self.http.static_dir = Some(PathBuf::from(value));
            self.provenance.track_field("http.static_dir", env(ENV_STATIC_DIR));
        }

        Ok(())
    }

    /// Record a command-line override for provenance reporting
    pub fn track_cli(&mut self, field_path: &str, flag: &str) {
        self.provenance
            .track_field(field_path, ConfigSource::Cli(flag.to_string()));
    }

    pub fn provenance(&self) -> &ConfigProvenance {
        &self.provenance
    }

    /// Export to YAML (v1 schema, every field explicit)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            strategy: Some(self.strategy),
            http: Some(HttpSection {
                host: Some(self.http.host.clone()),
                port: Some(self.http.port),
                static_dir: self.http.static_dir.clone(),
            }),
            store: Some(StoreSection {
                backend: Some(self.store.backend),
                path: self.store.path.clone(),
            }),
            admin: Some(AdminSection {
                username: Some(self.admin.username.clone()),
                password: Some(self.admin.password.clone()),
            }),
        };

        Ok(serde_yaml::to_string(&file)?)
    }
}
