//! Vaccine model. The only record type with full create/update/delete support.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vaccine {
    #[sqlx(rename = "vaccine_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub name: String,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub administered_by: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a vaccine record.
#[derive(Debug, Clone)]
pub struct CreateVaccine {
    pub person_id: Uuid,
    pub name: String,
    pub administered_on: NaiveDate,
    pub next_due_on: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub administered_by: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a vaccine record. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateVaccine {
    pub name: Option<String>,
    pub administered_on: Option<NaiveDate>,
    pub next_due_on: Option<NaiveDate>,
    pub lot_number: Option<String>,
    pub administered_by: Option<String>,
    pub notes: Option<String>,
}

impl UpdateVaccine {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.administered_on.is_none()
            && self.next_due_on.is_none()
            && self.lot_number.is_none()
            && self.administered_by.is_none()
            && self.notes.is_none()
    }
}
