//! Domain layer for ExpertStore
//!
//! # Domain Models
//!
//! - `User`: person screened (created on first diagnosis or via the admin API)
//! - `Symptom`: vocabulary entry (re-exported from diabscreen-core)
//! - `Recommendation`: advice item, optionally tied to one risk tier
//! - `DiagnosisRecord`: one-way append written after classification
//! - `UserSymptom`: one submitted code of one diagnosis
//! - `Stats`: table counts for the admin dashboard
//!
//! # Port Trait
//!
//! - `ExpertStore`: storage abstraction injected into the HTTP layer
//!
//! # Examples
//!
//! ```rust,ignore
//! use diabscreen_storage::{ExpertStore, NewDiagnosis, NewUser};
//!
//! async fn example(store: &dyn ExpertStore) -> Result<()> {
//!     let user = store.create_user(&NewUser::new("Siti Aminah")).await?;
//!     let result = classifier.classify(&observation);
//!     let id = store
//!         .save_diagnosis(&NewDiagnosis::from_result(Some(user.id), &observation, &result))
//!         .await?;
//!     assert_eq!(store.get_diagnosis(id).await?.risk_tier, result.risk_tier);
//!     Ok(())
//! }
//! ```

pub mod seed;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use diabscreen_core::{DiagnosisResult, RiskTier, ScoringStrategy, SymptomObservation};

use crate::{Result, StorageError};

pub use diabscreen_core::Symptom;

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// Person screened by the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User fields supplied by callers; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl NewUser {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            age: None,
            gender: None,
        }
    }

    pub fn with_demographics(mut self, age: Option<u32>, gender: Option<String>) -> Self {
        self.age = age;
        self.gender = gender;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(StorageError::invalid_input("user full_name must not be empty"));
        }
        Ok(())
    }
}

/// Advice item shown next to a diagnosis
///
/// `risk_tier = None` means the item applies to every tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub risk_tier: Option<RiskTier>,
}

impl Recommendation {
    pub fn applies_to(&self, tier: RiskTier) -> bool {
        self.risk_tier.map_or(true, |t| t == tier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecommendation {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub risk_tier: Option<RiskTier>,
}

impl NewRecommendation {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            risk_tier: None,
        }
    }

    pub fn for_tier(mut self, tier: RiskTier) -> Self {
        self.risk_tier = Some(tier);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StorageError::invalid_input(
                "recommendation title must not be empty",
            ));
        }
        Ok(())
    }
}

/// Persisted diagnosis (append-only from the classifier's point of view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub score: f64,
    pub risk_tier: RiskTier,
    /// Submitted codes in their original order
    pub symptoms: Vec<String>,
    pub strategy: ScoringStrategy,
    pub matched_rule: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDiagnosis {
    pub user_id: Option<i64>,
    pub score: f64,
    pub risk_tier: RiskTier,
    pub symptoms: Vec<String>,
    pub strategy: ScoringStrategy,
    pub matched_rule: Option<String>,
}

impl NewDiagnosis {
    /// Build the record to append from a classifier result
    pub fn from_result(
        user_id: Option<i64>,
        observation: &SymptomObservation,
        result: &DiagnosisResult,
    ) -> Self {
        Self {
            user_id,
            score: result.score,
            risk_tier: result.risk_tier,
            symptoms: observation.codes.clone(),
            strategy: result.strategy,
            matched_rule: result.matched_rule.clone(),
        }
    }
}

/// One submitted symptom code of one diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSymptom {
    pub diagnosis_id: i64,
    pub user_id: Option<i64>,
    pub symptom_code: String,
    /// 0-indexed position in the submitted list
    pub position: usize,
}

/// Table counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: usize,
    pub total_diagnoses: usize,
    pub total_symptoms: usize,
    pub total_recommendations: usize,
}

/// Reject symptoms the vocabulary cannot hold
pub fn validate_symptom(symptom: &Symptom) -> Result<()> {
    if symptom.code.trim().is_empty() {
        return Err(StorageError::invalid_input("symptom code must not be empty"));
    }
    if symptom.weight == 0 {
        return Err(StorageError::invalid_input(format!(
            "symptom {} weight must be positive",
            symptom.code
        )));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Port Trait: ExpertStore
// ═══════════════════════════════════════════════════════════════════════════

/// Data store for the expert system
///
/// # Core Operations
///
/// 1. **Users**: list, get, find by name, create, find-or-create, delete
/// 2. **Symptoms**: list (ordered by code), get, upsert, delete
/// 3. **Recommendations**: list, per-tier lookup, create, delete
/// 4. **Diagnoses**: append (with per-code rows), get, list newest first, delete
/// 5. **Dashboard**: `stats`, `ping`
///
/// Lookups by id return `ErrorKind::NotFound` for missing records; deletes do
/// the same. Deleting a user keeps its diagnoses with `user_id = None`.
///
/// # Implementations
///
/// - `InMemoryExpertStore`: seeded mock tables
/// - `SqliteExpertStore`: SQLite adapter
#[async_trait]
pub trait ExpertStore: Send + Sync {
    // ═══════════════════════════════════════════════════════════════════════
    // Users
    // ═══════════════════════════════════════════════════════════════════════

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: i64) -> Result<User>;

    /// Exact match on `full_name`; the oldest user wins on duplicates
    async fn find_user_by_name(&self, full_name: &str) -> Result<Option<User>>;

    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Oldest user named `user.full_name`, created from `user` when none exists
    ///
    /// Lookup and insert happen atomically, so concurrent calls with the same
    /// name resolve to one user.
    async fn find_or_create_user(&self, user: &NewUser) -> Result<User>;

    async fn delete_user(&self, id: i64) -> Result<()>;

    // ═══════════════════════════════════════════════════════════════════════
    // Symptoms
    // ═══════════════════════════════════════════════════════════════════════

    /// All symptoms ordered by code
    async fn list_symptoms(&self) -> Result<Vec<Symptom>>;

    async fn get_symptom(&self, code: &str) -> Result<Symptom>;

    /// Insert or replace by code
    async fn upsert_symptom(&self, symptom: &Symptom) -> Result<()>;

    async fn delete_symptom(&self, code: &str) -> Result<()>;

    // ═══════════════════════════════════════════════════════════════════════
    // Recommendations
    // ═══════════════════════════════════════════════════════════════════════

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>>;

    /// Items for `tier` plus tier-independent items, ordered by id
    async fn recommendations_for(&self, tier: RiskTier) -> Result<Vec<Recommendation>>;

    async fn create_recommendation(&self, rec: &NewRecommendation) -> Result<Recommendation>;

    async fn delete_recommendation(&self, id: i64) -> Result<()>;

    // ═══════════════════════════════════════════════════════════════════════
    // Diagnoses
    // ═══════════════════════════════════════════════════════════════════════

    /// Append a diagnosis and one `UserSymptom` row per submitted code
    ///
    /// Returns the new record id.
    async fn save_diagnosis(&self, diagnosis: &NewDiagnosis) -> Result<i64>;

    async fn get_diagnosis(&self, id: i64) -> Result<DiagnosisRecord>;

    /// Newest first
    async fn list_diagnoses(&self, limit: Option<usize>) -> Result<Vec<DiagnosisRecord>>;

    /// Removes the record and its `UserSymptom` rows
    async fn delete_diagnosis(&self, id: i64) -> Result<()>;

    /// Submitted codes, optionally restricted to one diagnosis
    async fn list_user_symptoms(&self, diagnosis_id: Option<i64>) -> Result<Vec<UserSymptom>>;

    // ═══════════════════════════════════════════════════════════════════════
    // Dashboard
    // ═══════════════════════════════════════════════════════════════════════

    async fn stats(&self) -> Result<Stats>;

    /// Cheap liveness probe against the backend
    async fn ping(&self) -> Result<()>;
}
