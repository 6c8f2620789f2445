use crate::dtos::{
    due_before_administered_errors, CreateVaccineRequest, PersonFilter, UpdateVaccineRequest,
};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::UpdateVaccine;
use crate::services::database::UpdateVaccineOutcome;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

pub async fn list_vaccines(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PersonFilter>,
) -> Result<impl IntoResponse, AppError> {
    let vaccines = state.db.list_vaccines(params.person_id).await?;
    Ok(Json(vaccines))
}

/// Record a vaccine for the family member in the path.
pub async fn create_vaccine(
    State(state): State<AppState>,
    ApiPath(person_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateVaccineRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if state.db.get_person(person_id).await?.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Family member not found"
        )));
    }

    let vaccine = state.db.create_vaccine(&req.into_input(person_id)).await?;
    Ok((StatusCode::CREATED, Json(vaccine)))
}

pub async fn update_vaccine(
    State(state): State<AppState>,
    ApiPath(vaccine_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateVaccineRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let update = UpdateVaccine::from(req);
    if update.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No fields to update")));
    }

    match state.db.update_vaccine(vaccine_id, &update).await? {
        UpdateVaccineOutcome::Updated(vaccine) => Ok(Json(vaccine)),
        UpdateVaccineOutcome::NotFound => {
            Err(AppError::NotFound(anyhow::anyhow!("Vaccine not found")))
        }
        UpdateVaccineOutcome::DueBeforeAdministered => {
            Err(AppError::ValidationError(due_before_administered_errors()))
        }
    }
}

pub async fn delete_vaccine(
    State(state): State<AppState>,
    ApiPath(vaccine_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_vaccine(vaccine_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Vaccine not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
