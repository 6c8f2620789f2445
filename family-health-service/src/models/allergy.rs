use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Allergy {
    #[sqlx(rename = "allergy_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub allergen: String,
    pub reaction: Option<String>,
    pub severity: String,
    pub noted_on: Option<NaiveDate>,
    pub created_utc: DateTime<Utc>,
}
