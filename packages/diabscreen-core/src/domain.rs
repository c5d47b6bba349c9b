//! Domain models shared by the classifier, the stores and the HTTP layer
//!
//! - `Symptom`: one entry of the diagnostic vocabulary
//! - `SymptomObservation`: codes reported for a single diagnosis request
//! - `RiskTier`: ordinal classification (`Low < Medium < High`)
//! - `DiagnosisResult`: classifier output, created fresh per request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classifier::ScoringStrategy;

// ═══════════════════════════════════════════════════════════════════════════
// Risk Tier
// ═══════════════════════════════════════════════════════════════════════════

/// Ordinal diabetes risk classification
///
/// The derived `Ord` follows declaration order, so `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = String;

    /// Accepts English names and the labels stored by older deployments
    /// (`Rendah`, `Sedang`, `Tinggi`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "rendah" => Ok(RiskTier::Low),
            "medium" | "sedang" => Ok(RiskTier::Medium),
            "high" | "tinggi" => Ok(RiskTier::High),
            other => Err(format!(
                "Unknown risk tier '{}'. Valid tiers: low, medium, high",
                other
            )),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Symptom
// ═══════════════════════════════════════════════════════════════════════════

/// One observable diagnostic indicator
///
/// `weight` is descriptive metadata for the admin UI; scoring never reads it.
///
/// # Examples
///
/// ```rust
/// use diabscreen_core::Symptom;
///
/// let symptom = Symptom::new("G01", "Frequent urination", 3);
/// assert_eq!(symptom.code, "G01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Symptom code (e.g. "G01")
    pub code: String,
    /// Human-readable label
    pub label: String,
    /// Positive descriptive weight
    pub weight: u32,
}

impl Symptom {
    pub fn new(code: impl Into<String>, label: impl Into<String>, weight: u32) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            weight,
        }
    }

    /// Default screening vocabulary (`G01`..`G06`)
    pub fn default_vocabulary() -> Vec<Symptom> {
        vec![
            Symptom::new("G01", "Frequent urination (polyuria)", 3),
            Symptom::new("G02", "Excessive thirst (polydipsia)", 3),
            Symptom::new("G03", "Constant hunger (polyphagia)", 2),
            Symptom::new("G04", "Unexplained weight loss", 2),
            Symptom::new("G05", "Blurred vision", 1),
            Symptom::new("G06", "Slow-healing wounds", 2),
        ]
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Symptom Observation
// ═══════════════════════════════════════════════════════════════════════════

/// Symptom codes reported for one diagnosis request
///
/// Codes keep the order in which they were supplied: the rule-based strategy
/// awards a positional bonus. Duplicates and unknown codes are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomObservation {
    /// Codes in submission order
    pub codes: Vec<String>,
    /// Count declared by the client, when it differs from `codes.len()`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_count: Option<usize>,
}

impl SymptomObservation {
    pub fn new(codes: Vec<String>) -> Self {
        Self {
            codes,
            declared_count: None,
        }
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(codes.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_declared_count(mut self, count: usize) -> Self {
        self.declared_count = Some(count);
        self
    }

    /// Cardinality used by proportional scoring
    ///
    /// A declared count only applies when at least one code was supplied;
    /// an empty observation always has cardinality 0.
    pub fn cardinality(&self) -> usize {
        if self.codes.is_empty() {
            return 0;
        }
        self.declared_count.unwrap_or(self.codes.len())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Diagnosis Result
// ═══════════════════════════════════════════════════════════════════════════

/// Classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub risk_tier: RiskTier,
    pub score: f64,
    /// Identifier of the rule that fired (rule-based strategy only)
    #[serde(default)]
    pub matched_rule: Option<String>,
    pub recommendation_text: String,
    pub strategy: ScoringStrategy,
}

impl DiagnosisResult {
    /// Narrative sentence shown next to the tier
    pub fn summary(&self) -> String {
        format!(
            "Based on the reported symptoms, you have a {} risk of developing diabetes.",
            self.risk_tier.as_str().to_lowercase()
        )
    }
}
