//! Screening flow: normalize, classify, persist, respond

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use diabscreen_storage::NewDiagnosis;

use crate::error::ApiResult;
use crate::http::dto::{DiagnosisRequest, DiagnosisResponse};
use crate::http::state::AppState;

pub async fn process(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> ApiResult<Json<DiagnosisResponse>> {
    let Json(request) = payload?;
    let observation = request.observation();

    // Patients are matched by full name; the first screening registers them
    let user_id = match request.new_user() {
        Some(new_user) => Some(state.store.find_or_create_user(&new_user).await?.id),
        None => None,
    };

    let result = state.classifier.classify(&observation);
    let diagnosis_id = state
        .store
        .save_diagnosis(&NewDiagnosis::from_result(user_id, &observation, &result))
        .await?;
    let recommendations = state.store.recommendations_for(result.risk_tier).await?;

    info!(
        diagnosis_id,
        tier = %result.risk_tier,
        score = result.score,
        symptoms = observation.codes.len(),
        "diagnosis recorded"
    );

    Ok(Json(DiagnosisResponse::new(
        diagnosis_id,
        user_id,
        observation.codes,
        result,
        recommendations,
    )))
}
