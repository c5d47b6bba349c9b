//! Request and response bodies
//!
//! Diagnosis requests arrive from forms and older clients, so the request
//! side is lenient: English or Indonesian field names, numeric strings for
//! the age, and a symptom list that may be missing or contain junk.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use diabscreen_core::{DiagnosisResult, RiskTier, ScoringStrategy, SymptomObservation};
use diabscreen_storage::{NewUser, Recommendation};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRequest {
    #[serde(default, alias = "full_name", alias = "name", alias = "nama_lengkap")]
    pub full_name: Option<String>,

    #[serde(default, alias = "usia")]
    pub age: Value,

    #[serde(default, alias = "jenis_kelamin")]
    pub gender: Option<String>,

    #[serde(default, alias = "gejala")]
    pub symptoms: Value,

    /// Overrides the list length for proportional scoring
    #[serde(default, alias = "symptom_count")]
    pub symptom_count: Option<usize>,
}

impl DiagnosisRequest {
    /// Symptom codes in submission order
    ///
    /// Anything that is not an array yields no codes; non-string elements
    /// are dropped. String codes pass through untouched, blanks included.
    pub fn symptom_codes(&self) -> Vec<String> {
        match &self.symptoms {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The declared count is dropped when no codes survive normalization
    pub fn observation(&self) -> SymptomObservation {
        let observation = SymptomObservation::new(self.symptom_codes());
        match self.symptom_count {
            Some(count) if !observation.is_empty() => observation.with_declared_count(count),
            _ => observation,
        }
    }

    /// Age as a number, accepting `45` or `"45"`
    pub fn age(&self) -> Option<u32> {
        match &self.age {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The patient to attach the record to; `None` for anonymous screenings
    pub fn new_user(&self) -> Option<NewUser> {
        let name = self.full_name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        let gender = self
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        Some(NewUser::new(name).with_demographics(self.age(), gender))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationItem {
    pub title: String,
    pub description: String,
}

impl From<Recommendation> for RecommendationItem {
    fn from(rec: Recommendation) -> Self {
        Self {
            title: rec.title,
            description: rec.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResponse {
    pub success: bool,
    pub diagnosis_id: i64,
    pub user_id: Option<i64>,
    pub risk_tier: RiskTier,
    pub score: f64,
    pub matched_rule: Option<String>,
    pub recommendation_text: String,
    pub strategy: ScoringStrategy,
    /// One-sentence summary for display
    pub diagnosis: String,
    pub recommendations: Vec<RecommendationItem>,
    pub symptoms: Vec<String>,
}

impl DiagnosisResponse {
    pub fn new(
        diagnosis_id: i64,
        user_id: Option<i64>,
        symptoms: Vec<String>,
        result: DiagnosisResult,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            success: true,
            diagnosis_id,
            user_id,
            diagnosis: result.summary(),
            risk_tier: result.risk_tier,
            score: result.score,
            matched_rule: result.matched_rule,
            recommendation_text: result.recommendation_text,
            strategy: result.strategy,
            recommendations: recommendations.into_iter().map(Into::into).collect(),
            symptoms,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `{ success: true, message }` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub risk_tier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSymptomQuery {
    pub diagnosis_id: Option<i64>,
}
