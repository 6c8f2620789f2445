//! HTTP handlers for the family health API.

pub mod appointments;
pub mod ask;
pub mod family_members;
pub mod health;
pub mod records;
pub mod reminders;
pub mod summary;
pub mod vaccines;
