//! diabscreen-server - REST backend for the diabetes screening expert system
//!
//! Wires a `RiskClassifier` and an `ExpertStore` into an axum router.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diabscreen_core::ServerConfig;
//! use diabscreen_server::{http, store, AppState};
//!
//! let config = ServerConfig::load(None)?;
//! let store = store::open(&config.store)?;
//! let state = AppState::new(store, config);
//! http::serve(state).await?;
//! ```

pub mod error;
pub mod http;
pub mod store;
pub mod telemetry;

pub use error::{ApiError, ApiResult};
pub use http::{create_router, AppState};
