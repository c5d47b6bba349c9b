//! diabscreen-storage - Data store for the diabetes screening expert system
//!
//! ## Core Principles
//!
//! 1. **Port first**: the HTTP layer only sees `ExpertStore`; backends are swappable
//! 2. **Append-only diagnoses**: records are written once, after classification
//! 3. **Classifier independence**: nothing here calls into the classifier
//!
//! ## Backends
//!
//! - `InMemoryExpertStore`: seeded mock tables, lost on restart
//! - `SqliteExpertStore`: SQLite file or `:memory:` (feature `sqlite`, on by default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diabscreen_storage::{ExpertStore, InMemoryExpertStore, NewUser};
//!
//! let store = InMemoryExpertStore::with_seed_data();
//! let user = store.create_user(&NewUser::new("Siti Aminah")).await?;
//! let symptoms = store.list_symptoms().await?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use domain::{
    DiagnosisRecord, ExpertStore, NewDiagnosis, NewRecommendation, NewUser, Recommendation,
    Stats, Symptom, User, UserSymptom,
};

pub use infrastructure::InMemoryExpertStore;

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteExpertStore;
