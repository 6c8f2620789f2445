//! Natural-language questions answered over the family's records.

use crate::dtos::{AskRequest, AskResponse};
use crate::extract::ApiJson;
use crate::services::metrics::record_ask;
use crate::services::providers::{ChatMessage, ProviderError};
use crate::services::build_health_context;
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use service_core::error::AppError;

pub async fn ask(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = match req.question() {
        Ok(q) => q.to_string(),
        Err(msg) => {
            record_ask("rejected");
            return Err(AppError::BadRequest(anyhow::anyhow!(msg)));
        }
    };

    let Some(assistant) = state.assistant.clone() else {
        record_ask("unavailable");
        return Err(AppError::ServiceUnavailable(
            "Assistant is not configured".to_string(),
        ));
    };

    let now = Utc::now();
    let records = state.db.load_family_records(None, now.date_naive()).await?;
    let context = build_health_context(&records, now);

    tracing::info!(
        provider = assistant.name(),
        family_members = records.len(),
        context_chars = context.len(),
        "Answering health question"
    );

    let messages = [ChatMessage::system(context), ChatMessage::user(question)];
    match assistant.complete(&messages).await {
        Ok(completion) => {
            record_ask("answered");
            tracing::info!(
                model = %completion.model,
                input_tokens = completion.input_tokens,
                output_tokens = completion.output_tokens,
                "Health question answered"
            );
            Ok(Json(AskResponse {
                answer: completion.text,
            }))
        }
        Err(ProviderError::NotConfigured(msg)) => {
            record_ask("unavailable");
            tracing::warn!(error = %msg, "Assistant provider not configured");
            Err(AppError::ServiceUnavailable(
                "Assistant is not configured".to_string(),
            ))
        }
        Err(e) => {
            record_ask("failed");
            Err(AppError::BadGateway(e.to_string()))
        }
    }
}
