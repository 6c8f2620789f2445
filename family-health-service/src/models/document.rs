use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    #[sqlx(rename = "document_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub file_url: String,
    pub uploaded_utc: DateTime<Utc>,
    pub notes: Option<String>,
}
