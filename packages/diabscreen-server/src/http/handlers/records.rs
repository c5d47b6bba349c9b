//! Users and stored diagnoses

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use diabscreen_storage::{DiagnosisRecord, NewUser, User, UserSymptom};

use crate::error::ApiResult;
use crate::http::dto::{ListQuery, MessageResponse, UserSymptomQuery};
use crate::http::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(user) = payload?;
    let created = state.store.create_user(&user).await?;
    info!(user_id = created.id, "user registered");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.store.get_user(id).await?))
}

/// Diagnoses of a deleted user are kept, detached from the user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_user(id).await?;
    Ok(Json(MessageResponse::ok(format!("User {} deleted", id))))
}

/// Newest first; `?limit=` caps the count
pub async fn list_diagnoses(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DiagnosisRecord>>> {
    let Query(query) = query?;
    Ok(Json(state.store.list_diagnoses(query.limit).await?))
}

pub async fn get_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DiagnosisRecord>> {
    Ok(Json(state.store.get_diagnosis(id).await?))
}

pub async fn delete_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_diagnosis(id).await?;
    Ok(Json(MessageResponse::ok(format!("Diagnosis {} deleted", id))))
}

pub async fn list_user_symptoms(
    State(state): State<AppState>,
    query: Result<Query<UserSymptomQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<UserSymptom>>> {
    let Query(query) = query?;
    Ok(Json(state.store.list_user_symptoms(query.diagnosis_id).await?))
}
