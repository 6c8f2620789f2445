//! Domain models for family-health-service.

mod allergy;
mod appointment;
mod document;
mod lab_result;
mod medication;
mod person;
mod records;
mod reminder;
mod summary;
mod vaccine;
mod vital;

pub use allergy::Allergy;
pub use appointment::{Appointment, AppointmentStatus, Clinic, Doctor};
pub use document::Document;
pub use lab_result::{LabComponent, LabFlag, LabResult, LabResultWithComponents};
pub use medication::Medication;
pub use person::{Person, Species};
pub use records::FamilyRecord;
pub use reminder::{Recurrence, Reminder, ReminderStatus};
pub use summary::HealthCounts;
pub use vaccine::{CreateVaccine, UpdateVaccine, Vaccine};
pub use vital::Vital;

#[cfg(test)]
pub(crate) use lab_result::component_fixture;
#[cfg(test)]
pub(crate) use person::person_fixture;

pub(crate) use lab_result::format_number;
