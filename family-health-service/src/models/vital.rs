use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A timestamped numeric health measurement (weight, heart rate, ...).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vital {
    #[sqlx(rename = "vital_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub kind: String,
    pub value: f64,
    pub unit: String,
    pub measured_utc: DateTime<Utc>,
    pub notes: Option<String>,
}
