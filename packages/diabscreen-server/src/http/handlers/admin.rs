use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::http::dto::{LoginRequest, MessageResponse};
use crate::http::state::AppState;

/// Check the submitted pair against the configured admin account
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(request) = payload?;
    let admin = &state.config.admin;

    if request.username != admin.username || request.password != admin.password {
        warn!(username = %request.username, "admin login rejected");
        return Err(ApiError::Unauthorized);
    }

    info!(username = %request.username, "admin logged in");
    Ok(Json(MessageResponse::ok("Login successful")))
}
