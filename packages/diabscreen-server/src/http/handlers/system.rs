use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use diabscreen_storage::Stats;

use crate::error::ApiResult;
use crate::http::dto::MessageResponse;
use crate::http::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "strategy": state.classifier.strategy(),
    }))
}

pub async fn test_db(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.store.ping().await?;
    Ok(Json(MessageResponse::ok("Database connection OK")))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<Stats>> {
    Ok(Json(state.store.stats().await?))
}
