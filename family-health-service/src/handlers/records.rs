//! Read-only listings of per-person health records.

use crate::dtos::{MedicationQuery, PersonFilter, VitalQuery};
use crate::extract::ApiQuery;
use crate::startup::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

pub async fn list_allergies(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PersonFilter>,
) -> Result<impl IntoResponse, AppError> {
    let allergies = state.db.list_allergies(params.person_id).await?;
    Ok(Json(allergies))
}

/// `active=true` limits the list to current prescriptions.
pub async fn list_medications(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MedicationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let medications = state
        .db
        .list_medications(params.person_id, params.active)
        .await?;
    Ok(Json(medications))
}

pub async fn list_vitals(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VitalQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = params
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let vitals = state.db.list_vitals(params.person_id, kind).await?;
    Ok(Json(vitals))
}

pub async fn list_lab_results(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PersonFilter>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.db.list_lab_results(params.person_id).await?;
    Ok(Json(results))
}

pub async fn list_documents(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PersonFilter>,
) -> Result<impl IntoResponse, AppError> {
    let documents = state.db.list_documents(params.person_id).await?;
    Ok(Json(documents))
}
