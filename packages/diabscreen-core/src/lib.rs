//! diabscreen-core - Symptom-based diabetes risk screening
//!
//! > "A handful of observed symptoms in, one risk tier out."
//!
//! ## Core Principles
//!
//! 1. **Pure classification**: `RiskClassifier::classify` has no hidden state and never fails
//! 2. **Named strategies**: proportional and rule-based scoring live behind one interface
//! 3. **Boundary normalization**: malformed input is cleaned up by the caller, not here
//!
//! ## Usage
//!
//! ```rust
//! use diabscreen_core::{RiskClassifier, RiskTier, ScoringStrategy, SymptomObservation};
//!
//! let classifier = RiskClassifier::new(ScoringStrategy::RuleBased);
//! let result = classifier.classify(&SymptomObservation::from_codes(["G01", "G02", "G06"]));
//!
//! assert_eq!(result.risk_tier, RiskTier::High);
//! assert_eq!(result.matched_rule.as_deref(), Some("R1"));
//! ```

pub mod classifier;
pub mod config;
pub mod domain;

pub use classifier::{RiskClassifier, ScoringStrategy, DEFAULT_RECOMMENDATION};
pub use config::{ConfigError, ConfigResult, ServerConfig, StoreBackend};
pub use domain::{DiagnosisResult, RiskTier, Symptom, SymptomObservation};
