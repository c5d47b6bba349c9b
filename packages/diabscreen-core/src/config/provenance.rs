//! Configuration provenance tracking
//!
//! Track where each configuration value came from (default, YAML, env, CLI)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field path → source of its current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProvenance {
    field_sources: BTreeMap<String, ConfigSource>,
}

/// Configuration source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// From YAML file
    Yaml { path: String },

    /// From environment variable
    Env(String),

    /// From command-line flag
    Cli(String),
}

impl ConfigProvenance {
    /// Record field-level override
    pub fn track_field(&mut self, field_path: &str, source: ConfigSource) {
        self.field_sources.insert(field_path.to_string(), source);
    }

    pub fn get_source(&self, field_path: &str) -> Option<&ConfigSource> {
        self.field_sources.get(field_path)
    }

    pub fn field_sources(&self) -> &BTreeMap<String, ConfigSource> {
        &self.field_sources
    }

    /// Human-readable summary; fields not listed kept their defaults
    pub fn summary(&self) -> String {
        if self.field_sources.is_empty() {
            return "All fields use defaults".to_string();
        }

        let mut lines = vec!["Overridden fields:".to_string()];
        for (field, source) in &self.field_sources {
            lines.push(format!("  {} ← {}", field, source.describe()));
        }
        lines.join("\n")
    }
}

impl ConfigSource {
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Yaml { path } => format!("yaml:{}", path),
            ConfigSource::Env(var) => format!("env:{}", var),
            ConfigSource::Cli(flag) => format!("cli:{}", flag),
        }
    }
}
