use serde::Serialize;
use sqlx::FromRow;

/// Dashboard counters, computed in a single round trip.
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct HealthCounts {
    pub family_members: i64,
    pub humans: i64,
    pub pets: i64,
    pub allergies: i64,
    pub active_medications: i64,
    pub vaccines: i64,
    pub vaccines_due_soon: i64,
    pub vitals: i64,
    pub lab_results: i64,
    pub pending_reminders: i64,
    pub overdue_reminders: i64,
    pub documents: i64,
    pub upcoming_appointments: i64,
}
