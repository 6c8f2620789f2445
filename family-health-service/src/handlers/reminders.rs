use crate::dtos::{CompleteReminderResponse, ReminderQuery};
use crate::extract::{ApiPath, ApiQuery};
use crate::services::database::CompleteReminder;
use crate::startup::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

pub async fn list_reminders(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ReminderQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let reminders = state
        .db
        .list_reminders(params.person_id, params.status, today)
        .await?;
    Ok(Json(reminders))
}

/// Complete a pending reminder. Recurring reminders come back with the
/// next occurrence already scheduled.
pub async fn complete_reminder(
    State(state): State<AppState>,
    ApiPath(reminder_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();

    match state.db.complete_reminder(reminder_id, today).await? {
        CompleteReminder::Completed { completed, next } => {
            tracing::info!(
                reminder_id = %reminder_id,
                next_due_on = ?next.as_ref().map(|r| r.due_on),
                "Reminder completed"
            );
            Ok(Json(CompleteReminderResponse { completed, next }))
        }
        CompleteReminder::NotFound => {
            Err(AppError::NotFound(anyhow::anyhow!("Reminder not found")))
        }
        CompleteReminder::NotPending(status) => Err(AppError::Conflict(anyhow::anyhow!(
            "Reminder is already {}",
            status.as_str()
        ))),
    }
}
