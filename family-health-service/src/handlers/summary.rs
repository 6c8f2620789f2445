use crate::dtos::HealthSummaryResponse;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use service_core::error::AppError;

/// How many reminders and appointments the dashboard previews.
const SUMMARY_PREVIEW_LIMIT: i64 = 5;

pub async fn health_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();

    let (counts, upcoming_reminders, upcoming_appointments) = tokio::try_join!(
        state.db.health_counts(today),
        state.db.upcoming_reminders(SUMMARY_PREVIEW_LIMIT, today),
        state
            .db
            .list_appointments(None, true, Some(SUMMARY_PREVIEW_LIMIT)),
    )?;

    Ok(Json(HealthSummaryResponse {
        counts,
        upcoming_reminders,
        upcoming_appointments,
    }))
}
