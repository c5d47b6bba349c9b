//! Risk classifier
//!
//! Two scoring strategies coexist behind one interface:
//!
//! - `Proportional`: `score = (n / 5) * 100`, tier by threshold
//! - `RuleBased`: ordered symptom-combination rules (first match wins)
//!   plus a positional bonus; the tier comes from the rule, not the score
//!
//! # Examples
//!
//! ```rust
//! use diabscreen_core::{RiskClassifier, RiskTier, ScoringStrategy, SymptomObservation};
//!
//! let classifier = RiskClassifier::new(ScoringStrategy::Proportional);
//! let result = classifier.classify(&SymptomObservation::from_codes(["G01", "G02", "G03", "G04"]));
//!
//! assert_eq!(result.score, 80.0);
//! assert_eq!(result.risk_tier, RiskTier::High);
//! ```

pub mod proportional;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::domain::{DiagnosisResult, SymptomObservation};

pub use rules::{Rule, RULES, SYMPTOM_VOCABULARY};

/// Recommendation attached to every result, whatever the tier
pub const DEFAULT_RECOMMENDATION: &str = "Consult a doctor for further examination";

/// Scoring strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Cardinality-based percentage with 40/70 thresholds
    Proportional,
    /// Forward-chaining rule table with additive positional bonus
    RuleBased,
}

impl ScoringStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proportional => "proportional",
            Self::RuleBased => "rule_based",
        }
    }

    /// Lowest score the strategy can produce (empty observation)
    pub fn minimum_score(&self) -> f64 {
        match self {
            Self::Proportional => 0.0,
            Self::RuleBased => rules::FALLBACK_SCORE,
        }
    }
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        Self::RuleBased
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proportional" => Ok(Self::Proportional),
            "rule_based" | "rule-based" | "rules" => Ok(Self::RuleBased),
            _ => Err(format!(
                "Unknown scoring strategy '{}'. Valid strategies: proportional, rule_based",
                s
            )),
        }
    }
}

/// Stateless symptom-to-risk classifier
///
/// Cheap to copy and safe to share across any number of concurrent requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskClassifier {
    strategy: ScoringStrategy,
}

impl RiskClassifier {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    /// Classify one observation
    ///
    /// Never fails: empty or unrecognized input degrades to the lowest tier.
    /// Codes are not validated against the vocabulary.
    pub fn classify(&self, observation: &SymptomObservation) -> DiagnosisResult {
        let (risk_tier, score, matched_rule) = match self.strategy {
            ScoringStrategy::Proportional => {
                let (tier, score) = proportional::score(observation.cardinality());
                (tier, score, None)
            }
            ScoringStrategy::RuleBased => {
                let outcome = rules::evaluate(&observation.codes);
                (
                    outcome.tier,
                    outcome.base_score + outcome.bonus,
                    outcome.rule.map(|r| r.id.to_string()),
                )
            }
        };

        debug!(
            strategy = %self.strategy,
            symptoms = observation.codes.len(),
            tier = %risk_tier,
            score,
            "classified observation"
        );

        DiagnosisResult {
            risk_tier,
            score,
            matched_rule,
            recommendation_text: DEFAULT_RECOMMENDATION.to_string(),
            strategy: self.strategy,
        }
    }

    /// Convenience wrapper over `classify` for plain code lists
    pub fn classify_codes<I, S>(&self, codes: I) -> DiagnosisResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classify(&SymptomObservation::from_codes(codes))
    }
}
