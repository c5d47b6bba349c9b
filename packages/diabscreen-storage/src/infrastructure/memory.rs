//! In-memory expert store
//!
//! Lock-guarded tables, optionally seeded with the default vocabulary and
//! recommendation list. Contents are lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use diabscreen_core::RiskTier;

use crate::domain::seed::{default_recommendations, default_symptoms};
use crate::domain::{
    validate_symptom, DiagnosisRecord, ExpertStore, NewDiagnosis, NewRecommendation, NewUser,
    Recommendation, Stats, Symptom, User, UserSymptom,
};
use crate::{Result, StorageError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    symptoms: BTreeMap<String, Symptom>,
    recommendations: BTreeMap<i64, Recommendation>,
    diagnoses: BTreeMap<i64, DiagnosisRecord>,
    user_symptoms: Vec<UserSymptom>,
    next_user_id: i64,
    next_recommendation_id: i64,
    next_diagnosis_id: i64,
}

impl Tables {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn insert_recommendation(&mut self, rec: &NewRecommendation) -> Recommendation {
        let id = Self::allocate(&mut self.next_recommendation_id);
        let rec = Recommendation {
            id,
            title: rec.title.clone(),
            description: rec.description.clone(),
            risk_tier: rec.risk_tier,
        };
        self.recommendations.insert(id, rec.clone());
        rec
    }

    /// Users iterate in id order, so the oldest match wins
    fn user_by_name(&self, full_name: &str) -> Option<&User> {
        self.users.values().find(|u| u.full_name == full_name)
    }

    fn insert_user(&mut self, user: &NewUser) -> User {
        let id = Self::allocate(&mut self.next_user_id);
        let created = User {
            id,
            full_name: user.full_name.clone(),
            age: user.age,
            gender: user.gender.clone(),
            created_at: Utc::now(),
        };
        self.users.insert(id, created.clone());
        debug!(user_id = id, "created user");
        created
    }
}

#[derive(Clone, Default)]
pub struct InMemoryExpertStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryExpertStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the default vocabulary and recommendations
    pub fn with_seed_data() -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write();
            for symptom in default_symptoms() {
                tables.symptoms.insert(symptom.code.clone(), symptom);
            }
            for rec in default_recommendations() {
                tables.insert_recommendation(&rec);
            }
        }
        store
    }
}

#[async_trait]
impl ExpertStore for InMemoryExpertStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().users.values().cloned().collect())
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        self.tables
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("User", id))
    }

    async fn find_user_by_name(&self, full_name: &str) -> Result<Option<User>> {
        Ok(self.tables.read().user_by_name(full_name).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        Ok(self.tables.write().insert_user(user))
    }

    async fn find_or_create_user(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        let mut tables = self.tables.write();
        if let Some(existing) = tables.user_by_name(&user.full_name) {
            return Ok(existing.clone());
        }
        Ok(tables.insert_user(user))
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.users.remove(&id).is_none() {
            return Err(StorageError::not_found("User", id));
        }
        for record in tables.diagnoses.values_mut() {
            if record.user_id == Some(id) {
                record.user_id = None;
            }
        }
        for row in tables.user_symptoms.iter_mut() {
            if row.user_id == Some(id) {
                row.user_id = None;
            }
        }
        Ok(())
    }

    async fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        Ok(self.tables.read().symptoms.values().cloned().collect())
    }

    async fn get_symptom(&self, code: &str) -> Result<Symptom> {
        self.tables
            .read()
            .symptoms
            .get(code)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Symptom", code))
    }

    async fn upsert_symptom(&self, symptom: &Symptom) -> Result<()> {
        validate_symptom(symptom)?;
        self.tables
            .write()
            .symptoms
            .insert(symptom.code.clone(), symptom.clone());
        Ok(())
    }

    async fn delete_symptom(&self, code: &str) -> Result<()> {
        self.tables
            .write()
            .symptoms
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Symptom", code))
    }

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>> {
        Ok(self.tables.read().recommendations.values().cloned().collect())
    }

    async fn recommendations_for(&self, tier: RiskTier) -> Result<Vec<Recommendation>> {
        Ok(self
            .tables
            .read()
            .recommendations
            .values()
            .filter(|r| r.applies_to(tier))
            .cloned()
            .collect())
    }

    async fn create_recommendation(&self, rec: &NewRecommendation) -> Result<Recommendation> {
        rec.validate()?;
        Ok(self.tables.write().insert_recommendation(rec))
    }

    async fn delete_recommendation(&self, id: i64) -> Result<()> {
        self.tables
            .write()
            .recommendations
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found("Recommendation", id))
    }

    async fn save_diagnosis(&self, diagnosis: &NewDiagnosis) -> Result<i64> {
        let mut tables = self.tables.write();
        let id = Tables::allocate(&mut tables.next_diagnosis_id);

        tables.diagnoses.insert(
            id,
            DiagnosisRecord {
                id,
                user_id: diagnosis.user_id,
                score: diagnosis.score,
                risk_tier: diagnosis.risk_tier,
                symptoms: diagnosis.symptoms.clone(),
                strategy: diagnosis.strategy,
                matched_rule: diagnosis.matched_rule.clone(),
                created_at: Utc::now(),
            },
        );

        for (position, code) in diagnosis.symptoms.iter().enumerate() {
            tables.user_symptoms.push(UserSymptom {
                diagnosis_id: id,
                user_id: diagnosis.user_id,
                symptom_code: code.clone(),
                position,
            });
        }

        debug!(diagnosis_id = id, tier = %diagnosis.risk_tier, "saved diagnosis");
        Ok(id)
    }

    async fn get_diagnosis(&self, id: i64) -> Result<DiagnosisRecord> {
        self.tables
            .read()
            .diagnoses
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Diagnosis", id))
    }

    async fn list_diagnoses(&self, limit: Option<usize>) -> Result<Vec<DiagnosisRecord>> {
        let tables = self.tables.read();
        let newest_first = tables.diagnoses.values().rev().cloned();
        Ok(match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        })
    }

    async fn delete_diagnosis(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.diagnoses.remove(&id).is_none() {
            return Err(StorageError::not_found("Diagnosis", id));
        }
        tables.user_symptoms.retain(|row| row.diagnosis_id != id);
        Ok(())
    }

    async fn list_user_symptoms(&self, diagnosis_id: Option<i64>) -> Result<Vec<UserSymptom>> {
        Ok(self
            .tables
            .read()
            .user_symptoms
            .iter()
            .filter(|row| diagnosis_id.map_or(true, |id| row.diagnosis_id == id))
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<Stats> {
        let tables = self.tables.read();
        Ok(Stats {
            total_users: tables.users.len(),
            total_diagnoses: tables.diagnoses.len(),
            total_symptoms: tables.symptoms.len(),
            total_recommendations: tables.recommendations.len(),
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
