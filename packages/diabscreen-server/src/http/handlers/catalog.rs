//! Symptom vocabulary and recommendation list

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use diabscreen_core::{RiskTier, Symptom};
use diabscreen_storage::{NewRecommendation, Recommendation};

use crate::error::{ApiError, ApiResult};
use crate::http::dto::{MessageResponse, RecommendationQuery};
use crate::http::state::AppState;

pub async fn list_symptoms(State(state): State<AppState>) -> ApiResult<Json<Vec<Symptom>>> {
    Ok(Json(state.store.list_symptoms().await?))
}

pub async fn get_symptom(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Symptom>> {
    Ok(Json(state.store.get_symptom(&code).await?))
}

/// Insert or replace by code
pub async fn upsert_symptom(
    State(state): State<AppState>,
    payload: Result<Json<Symptom>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Symptom>)> {
    let Json(symptom) = payload?;
    state.store.upsert_symptom(&symptom).await?;
    info!(code = %symptom.code, "symptom saved");
    Ok((StatusCode::CREATED, Json(symptom)))
}

pub async fn delete_symptom(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_symptom(&code).await?;
    Ok(Json(MessageResponse::ok(format!("Symptom {} deleted", code))))
}

/// All recommendations, or those applying to `?risk_tier=`
pub async fn list_recommendations(
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Recommendation>>> {
    let Query(query) = query?;
    let recs = match query.risk_tier {
        Some(raw) => {
            let tier: RiskTier = raw.parse().map_err(ApiError::BadRequest)?;
            state.store.recommendations_for(tier).await?
        }
        None => state.store.list_recommendations().await?,
    };
    Ok(Json(recs))
}

pub async fn create_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<NewRecommendation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Recommendation>)> {
    let Json(rec) = payload?;
    let created = state.store.create_recommendation(&rec).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_recommendation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_recommendation(id).await?;
    Ok(Json(MessageResponse::ok(format!("Recommendation {} deleted", id))))
}
