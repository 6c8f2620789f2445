use crate::dtos::FamilyMemberQuery;
use crate::extract::{ApiPath, ApiQuery};
use crate::startup::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

/// Family members sorted by name, optionally filtered by species.
pub async fn list_family_members(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FamilyMemberQuery>,
) -> Result<impl IntoResponse, AppError> {
    let people = state
        .db
        .list_people(params.species.map(|s| s.as_str()))
        .await?;

    tracing::debug!(count = people.len(), "Listed family members");
    Ok(Json(people))
}

/// One family member with every record attached to them.
pub async fn get_family_member(
    State(state): State<AppState>,
    ApiPath(person_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let record = state
        .db
        .load_family_records(Some(person_id), today)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Family member not found")))?;

    Ok(Json(record))
}
