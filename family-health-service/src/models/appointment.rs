//! Appointments and the doctor/clinic directory they reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Appointment row with the doctor and clinic names joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Appointment {
    #[sqlx(rename = "appointment_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub doctor_name: Option<String>,
    pub clinic_id: Option<Uuid>,
    pub clinic_name: Option<String>,
    pub scheduled_utc: DateTime<Utc>,
    pub reason: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
    #[sqlx(rename = "doctor_id")]
    pub id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub clinic_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Clinic {
    #[sqlx(rename = "clinic_id")]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}
