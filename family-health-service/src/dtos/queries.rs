//! Query-string filters for the list endpoints.

use crate::models::{ReminderStatus, Species};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct FamilyMemberQuery {
    pub species: Option<Species>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonFilter {
    pub person_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MedicationQuery {
    pub person_id: Option<Uuid>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VitalQuery {
    pub person_id: Option<Uuid>,
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReminderQuery {
    pub person_id: Option<Uuid>,
    pub status: Option<ReminderStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppointmentQuery {
    pub person_id: Option<Uuid>,
    #[serde(default)]
    pub upcoming: bool,
}
