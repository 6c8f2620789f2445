use crate::models::{Appointment, HealthCounts, Reminder};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthSummaryResponse {
    pub counts: HealthCounts,
    pub upcoming_reminders: Vec<Reminder>,
    pub upcoming_appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct CompleteReminderResponse {
    pub completed: Reminder,
    pub next: Option<Reminder>,
}
