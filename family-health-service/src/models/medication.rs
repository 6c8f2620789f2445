use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Medication {
    #[sqlx(rename = "medication_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prescribed_by: Option<String>,
    pub active: bool,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}
