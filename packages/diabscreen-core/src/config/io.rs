//! Configuration file schema (YAML v1)
//!
//! Every section is optional; omitted values keep their defaults. Unknown
//! fields are rejected so typos surface at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::StoreBackend;
use crate::classifier::ScoringStrategy;

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1); optional here so absence can be reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ScoringStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<StoreBackend>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let yaml = r#"
version: 1
http:
  port: 8080
"#;
        let file: ConfigFileV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.version, Some(1));
        assert_eq!(file.http.unwrap().port, Some(8080));
        assert!(file.store.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
version: 1
http:
  prot: 8080
"#;
        assert!(serde_yaml::from_str::<ConfigFileV1>(yaml).is_err());
    }

    #[test]
    fn test_strategy_names() {
        let file: ConfigFileV1 = serde_yaml::from_str("version: 1\nstrategy: proportional\n").unwrap();
        assert_eq!(file.strategy, Some(ScoringStrategy::Proportional));
    }
}
