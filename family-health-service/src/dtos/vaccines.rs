//! Vaccine create/update payloads.

use crate::models::{CreateVaccine, UpdateVaccine};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn due_before_administered() -> ValidationError {
    let mut err = ValidationError::new("next_due_before_administered");
    err.message = Some("next_due_on must not be before administered_on".into());
    err
}

fn due_after_administered(
    administered_on: Option<NaiveDate>,
    next_due_on: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(given), Some(due)) = (administered_on, next_due_on) {
        if due < given {
            return Err(due_before_administered());
        }
    }
    Ok(())
}

/// The date-order failure for an update that only conflicts with the stored row.
pub fn due_before_administered_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add("next_due_on", due_before_administered());
    errors
}

fn validate_create_dates(req: &CreateVaccineRequest) -> Result<(), ValidationError> {
    due_after_administered(Some(req.administered_on), req.next_due_on)
}

fn validate_update_dates(req: &UpdateVaccineRequest) -> Result<(), ValidationError> {
    due_after_administered(req.administered_on, req.next_due_on)
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_create_dates"))]
pub struct CreateVaccineRequest {
    #[validate(
        length(max = 200, message = "Vaccine name must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,

    pub administered_on: NaiveDate,

    pub next_due_on: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub lot_number: Option<String>,

    #[validate(length(max = 200))]
    pub administered_by: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl CreateVaccineRequest {
    pub fn into_input(self, person_id: Uuid) -> CreateVaccine {
        CreateVaccine {
            person_id,
            name: self.name.trim().to_string(),
            administered_on: self.administered_on,
            next_due_on: self.next_due_on,
            lot_number: clean(self.lot_number),
            administered_by: clean(self.administered_by),
            notes: clean(self.notes),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_dates"))]
pub struct UpdateVaccineRequest {
    #[validate(
        length(max = 200, message = "Vaccine name must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub administered_on: Option<NaiveDate>,

    pub next_due_on: Option<NaiveDate>,

    #[validate(length(max = 100))]
    pub lot_number: Option<String>,

    #[validate(length(max = 200))]
    pub administered_by: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<UpdateVaccineRequest> for UpdateVaccine {
    fn from(req: UpdateVaccineRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            administered_on: req.administered_on,
            next_due_on: req.next_due_on,
            lot_number: clean(req.lot_number),
            administered_by: clean(req.administered_by),
            notes: clean(req.notes),
        }
    }
}
