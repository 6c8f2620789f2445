use crate::dtos::AppointmentQuery;
use crate::extract::ApiQuery;
use crate::startup::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Appointments by scheduled time. `upcoming=true` keeps future visits that
/// are still scheduled.
pub async fn list_appointments(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AppointmentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = state
        .db
        .list_appointments(params.person_id, params.upcoming, None)
        .await?;
    Ok(Json(appointments))
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_doctors().await?))
}

pub async fn list_clinics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_clinics().await?))
}
