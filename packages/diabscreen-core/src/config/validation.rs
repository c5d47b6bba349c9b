//! Configuration validation

use super::error::{ConfigError, ConfigResult};
use super::{AdminConfig, HttpConfig, ServerConfig, StoreBackend, StoreConfig};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "http.port",
                "port 0 is not allowed; pick a fixed port",
            ));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("http.host", "host must not be empty"));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "http"
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.backend == StoreBackend::Sqlite {
            let missing = self
                .path
                .as_ref()
                .map_or(true, |p| p.as_os_str().is_empty());
            if missing {
                return Err(ConfigError::validation(
                    "store.path",
                    "required for the sqlite backend (use \":memory:\" for a throwaway database)",
                ));
            }
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "store"
    }
}

impl Validatable for AdminConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::validation(
                "admin.username",
                "username must not be empty",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "admin"
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.http.validate()?;
        self.store.validate()?;
        self.admin.validate()
    }

    fn config_name(&self) -> &'static str {
        "server"
    }
}
