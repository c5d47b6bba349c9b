//! SQLite adapter for ExpertStore
//!
//! One connection behind a mutex. Timestamps are stored as Unix milliseconds
//! and the submitted symptom list as a JSON array. Risk tier columns also
//! accept the Indonesian labels written by older deployments.

mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use diabscreen_core::{RiskTier, ScoringStrategy};

use crate::domain::seed::{default_recommendations, default_symptoms};
use crate::domain::{
    validate_symptom, DiagnosisRecord, ExpertStore, NewDiagnosis, NewRecommendation, NewUser,
    Recommendation, Stats, Symptom, User, UserSymptom,
};
use crate::{Result, StorageError};

/// SQLite-based ExpertStore implementation
#[derive(Clone)]
pub struct SqliteExpertStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExpertStore {
    /// Open (or create) a database file; `":memory:"` opens a private in-memory database
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = if db_path.as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(db_path)?
        };
        let store = Self::from_connection(conn)?;
        info!(path = %db_path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::init(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Load the default vocabulary and recommendations into empty tables
    ///
    /// Returns `true` when anything was inserted.
    pub fn seed(&self) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut seeded = false;

        let symptoms: i64 = tx.query_row("SELECT COUNT(*) FROM symptoms", [], |r| r.get(0))?;
        if symptoms == 0 {
            for symptom in default_symptoms() {
                tx.execute(
                    "INSERT INTO symptoms (code, label, weight) VALUES (?1, ?2, ?3)",
                    params![symptom.code, symptom.label, symptom.weight],
                )?;
            }
            seeded = true;
        }

        let recs: i64 = tx.query_row("SELECT COUNT(*) FROM recommendations", [], |r| r.get(0))?;
        if recs == 0 {
            for rec in default_recommendations() {
                tx.execute(
                    "INSERT INTO recommendations (title, description, risk_tier) VALUES (?1, ?2, ?3)",
                    params![rec.title, rec.description, rec.risk_tier.map(|t| t.as_str())],
                )?;
            }
            seeded = true;
        }

        tx.commit()?;
        if seeded {
            debug!("seeded sqlite store with default data");
        }
        Ok(seeded)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════════════════════════════════════

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn parse_tier(raw: &str) -> Result<RiskTier> {
    raw.parse()
        .map_err(|e: String| StorageError::serialization(format!("bad risk_tier column: {}", e)))
}

fn parse_strategy(raw: &str) -> Result<ScoringStrategy> {
    raw.parse()
        .map_err(|e: String| StorageError::serialization(format!("bad strategy column: {}", e)))
}

const USER_COLUMNS: &str = "id, full_name, age, gender, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        created_at: timestamp(row.get(4)?),
    })
}

fn select_user_by_name(conn: &Connection, full_name: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!(
                "SELECT {} FROM users WHERE full_name = ?1 ORDER BY id LIMIT 1",
                USER_COLUMNS
            ),
            params![full_name],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn insert_user(conn: &Connection, user: &NewUser) -> Result<User> {
    let created_at = Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO users (full_name, age, gender, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&user.full_name, user.age, &user.gender, created_at],
    )?;
    let id = conn.last_insert_rowid();
    debug!(user_id = id, "created user");

    Ok(User {
        id,
        full_name: user.full_name.clone(),
        age: user.age,
        gender: user.gender.clone(),
        created_at: timestamp(created_at),
    })
}

const SYMPTOM_COLUMNS: &str = "code, label, weight";

fn symptom_from_row(row: &Row<'_>) -> rusqlite::Result<Symptom> {
    Ok(Symptom {
        code: row.get(0)?,
        label: row.get(1)?,
        weight: row.get(2)?,
    })
}

const RECOMMENDATION_COLUMNS: &str = "id, title, description, risk_tier";

/// Raw row; tier text is parsed outside the rusqlite closure
struct RecommendationRow {
    id: i64,
    title: String,
    description: String,
    risk_tier: Option<String>,
}

impl RecommendationRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            risk_tier: row.get(3)?,
        })
    }

    fn into_recommendation(self) -> Result<Recommendation> {
        Ok(Recommendation {
            id: self.id,
            title: self.title,
            description: self.description,
            risk_tier: self.risk_tier.as_deref().map(parse_tier).transpose()?,
        })
    }
}

const DIAGNOSIS_COLUMNS: &str =
    "id, user_id, score, risk_tier, symptoms, strategy, matched_rule, created_at";

struct DiagnosisRow {
    id: i64,
    user_id: Option<i64>,
    score: f64,
    risk_tier: String,
    symptoms: String,
    strategy: String,
    matched_rule: Option<String>,
    created_at: i64,
}

impl DiagnosisRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            score: row.get(2)?,
            risk_tier: row.get(3)?,
            symptoms: row.get(4)?,
            strategy: row.get(5)?,
            matched_rule: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<DiagnosisRecord> {
        Ok(DiagnosisRecord {
            id: self.id,
            user_id: self.user_id,
            score: self.score,
            risk_tier: parse_tier(&self.risk_tier)?,
            symptoms: serde_json::from_str(&self.symptoms)?,
            strategy: parse_strategy(&self.strategy)?,
            matched_rule: self.matched_rule,
            created_at: timestamp(self.created_at),
        })
    }
}

fn count(conn: &Connection, table: &str) -> Result<usize> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(n as usize)
}

fn ensure_changed(changed: usize, entity: &str, id: impl std::fmt::Display) -> Result<()> {
    if changed == 0 {
        return Err(StorageError::not_found(entity, id));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// ExpertStore
// ═══════════════════════════════════════════════════════════════════════════

#[async_trait]
impl ExpertStore for SqliteExpertStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id],
            user_from_row,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("User", id))
    }

    async fn find_user_by_name(&self, full_name: &str) -> Result<Option<User>> {
        let conn = self.conn.lock();
        select_user_by_name(&conn, full_name)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        let conn = self.conn.lock();
        insert_user(&conn, user)
    }

    async fn find_or_create_user(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let resolved = match select_user_by_name(&tx, &user.full_name)? {
            Some(existing) => existing,
            None => insert_user(&tx, user)?,
        };
        tx.commit()?;
        Ok(resolved)
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        ensure_changed(changed, "User", id)
    }

    async fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM symptoms ORDER BY code",
            SYMPTOM_COLUMNS
        ))?;
        let symptoms = stmt
            .query_map([], symptom_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(symptoms)
    }

    async fn get_symptom(&self, code: &str) -> Result<Symptom> {
        let conn = self.conn.lock();
        conn.query_row(
            &format!("SELECT {} FROM symptoms WHERE code = ?1", SYMPTOM_COLUMNS),
            params![code],
            symptom_from_row,
        )
        .optional()?
        .ok_or_else(|| StorageError::not_found("Symptom", code))
    }

    async fn upsert_symptom(&self, symptom: &Symptom) -> Result<()> {
        validate_symptom(symptom)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO symptoms (code, label, weight) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO UPDATE SET label = excluded.label, weight = excluded.weight",
            params![&symptom.code, &symptom.label, symptom.weight],
        )?;
        Ok(())
    }

    async fn delete_symptom(&self, code: &str) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM symptoms WHERE code = ?1", params![code])?;
        ensure_changed(changed, "Symptom", code)
    }

    async fn list_recommendations(&self) -> Result<Vec<Recommendation>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recommendations ORDER BY id",
            RECOMMENDATION_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], RecommendationRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(RecommendationRow::into_recommendation)
            .collect()
    }

    async fn recommendations_for(&self, tier: RiskTier) -> Result<Vec<Recommendation>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recommendations
             WHERE risk_tier IS NULL OR risk_tier = ?1
             ORDER BY id",
            RECOMMENDATION_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![tier.as_str()], RecommendationRow::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(RecommendationRow::into_recommendation)
            .collect()
    }

    async fn create_recommendation(&self, rec: &NewRecommendation) -> Result<Recommendation> {
        rec.validate()?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO recommendations (title, description, risk_tier) VALUES (?1, ?2, ?3)",
            params![&rec.title, &rec.description, rec.risk_tier.map(|t| t.as_str())],
        )?;
        Ok(Recommendation {
            id: conn.last_insert_rowid(),
            title: rec.title.clone(),
            description: rec.description.clone(),
            risk_tier: rec.risk_tier,
        })
    }

    async fn delete_recommendation(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM recommendations WHERE id = ?1", params![id])?;
        ensure_changed(changed, "Recommendation", id)
    }

    async fn save_diagnosis(&self, diagnosis: &NewDiagnosis) -> Result<i64> {
        let symptoms_json = serde_json::to_string(&diagnosis.symptoms)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO diagnoses (user_id, score, risk_tier, symptoms, strategy, matched_rule, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                diagnosis.user_id,
                diagnosis.score,
                diagnosis.risk_tier.as_str(),
                symptoms_json,
                diagnosis.strategy.as_str(),
                &diagnosis.matched_rule,
                Utc::now().timestamp_millis()
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO user_symptoms (diagnosis_id, user_id, symptom_code, position)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, code) in diagnosis.symptoms.iter().enumerate() {
                stmt.execute(params![id, diagnosis.user_id, code, position as i64])?;
            }
        }

        tx.commit()?;
        debug!(diagnosis_id = id, tier = %diagnosis.risk_tier, "saved diagnosis");
        Ok(id)
    }

    async fn get_diagnosis(&self, id: i64) -> Result<DiagnosisRecord> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                &format!("SELECT {} FROM diagnoses WHERE id = ?1", DIAGNOSIS_COLUMNS),
                params![id],
                DiagnosisRow::read,
            )
            .optional()?
        };
        row.ok_or_else(|| StorageError::not_found("Diagnosis", id))?
            .into_record()
    }

    async fn list_diagnoses(&self, limit: Option<usize>) -> Result<Vec<DiagnosisRecord>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, |n| n as i64);
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM diagnoses ORDER BY id DESC LIMIT ?1",
                DIAGNOSIS_COLUMNS
            ))?;
            let rows = stmt
                .query_map(params![limit], DiagnosisRow::read)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(DiagnosisRow::into_record).collect()
    }

    async fn delete_diagnosis(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock();
        let changed = conn.execute("DELETE FROM diagnoses WHERE id = ?1", params![id])?;
        ensure_changed(changed, "Diagnosis", id)
    }

    async fn list_user_symptoms(&self, diagnosis_id: Option<i64>) -> Result<Vec<UserSymptom>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT diagnosis_id, user_id, symptom_code, position FROM user_symptoms
             WHERE ?1 IS NULL OR diagnosis_id = ?1
             ORDER BY diagnosis_id, position",
        )?;
        let rows = stmt
            .query_map(params![diagnosis_id], |row| {
                Ok(UserSymptom {
                    diagnosis_id: row.get(0)?,
                    user_id: row.get(1)?,
                    symptom_code: row.get(2)?,
                    position: row.get::<_, i64>(3)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn stats(&self) -> Result<Stats> {
        let conn = self.conn.lock();
        Ok(Stats {
            total_users: count(&conn, "users")?,
            total_diagnoses: count(&conn, "diagnoses")?,
            total_symptoms: count(&conn, "symptoms")?,
            total_recommendations: count(&conn, "recommendations")?,
        })
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = SqliteExpertStore::in_memory().unwrap();
        assert!(store.seed().unwrap());
        assert!(!store.seed().unwrap());

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_symptoms, 6);
        assert_eq!(stats.total_recommendations, 5);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screening.db");

        {
            let store = SqliteExpertStore::open(&path).unwrap();
            store.create_user(&NewUser::new("Persisted")).await.unwrap();
        }

        let reopened = SqliteExpertStore::open(&path).unwrap();
        let user = reopened.find_user_by_name("Persisted").await.unwrap();
        assert!(user.is_some());
    }

    #[tokio::test]
    async fn test_delete_diagnosis_cascades() {
        let store = SqliteExpertStore::in_memory().unwrap();
        let id = store
            .save_diagnosis(&NewDiagnosis {
                user_id: None,
                score: 40.0,
                risk_tier: RiskTier::Low,
                symptoms: vec!["G99".to_string()],
                strategy: ScoringStrategy::RuleBased,
                matched_rule: None,
            })
            .await
            .unwrap();
        assert_eq!(store.list_user_symptoms(Some(id)).await.unwrap().len(), 1);

        store.delete_diagnosis(id).await.unwrap();
        assert!(store.list_user_symptoms(Some(id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_tier_column_is_serialization_error() {
        let store = SqliteExpertStore::in_memory().unwrap();
        {
            let conn = store.conn.lock();
            conn.execute(
                "INSERT INTO diagnoses (user_id, score, risk_tier, symptoms, strategy, matched_rule, created_at)
                 VALUES (NULL, 1.0, 'Critical', '[]', 'rule_based', NULL, 0)",
                [],
            )
            .unwrap();
        }

        let err = store.get_diagnosis(1).await.unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::Serialization);
    }

    #[tokio::test]
    async fn test_legacy_tier_labels_are_read() {
        let store = SqliteExpertStore::in_memory().unwrap();
        {
            let conn = store.conn.lock();
            conn.execute(
                "INSERT INTO diagnoses (user_id, score, risk_tier, symptoms, strategy, matched_rule, created_at)
                 VALUES (NULL, 0.6, 'Sedang', '[\"G01\"]', 'proportional', NULL, 0)",
                [],
            )
            .unwrap();
        }

        let record = store.get_diagnosis(1).await.unwrap();
        assert_eq!(record.risk_tier, RiskTier::Medium);
        assert_eq!(record.strategy, ScoringStrategy::Proportional);
    }
}
