//! Request and response shapes for the HTTP API.

pub mod ask;
pub mod queries;
pub mod summary;
pub mod vaccines;

pub use ask::{AskRequest, AskResponse, MAX_QUESTION_CHARS};
pub use queries::{
    AppointmentQuery, FamilyMemberQuery, MedicationQuery, PersonFilter, ReminderQuery, VitalQuery,
};
pub use summary::{CompleteReminderResponse, HealthSummaryResponse};
pub use vaccines::{due_before_administered_errors, CreateVaccineRequest, UpdateVaccineRequest};
