//! Infrastructure layer - Storage adapters

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryExpertStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExpertStore;
