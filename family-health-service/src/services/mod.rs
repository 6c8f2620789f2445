//! Services module for family-health-service.

pub mod context;
pub mod database;
pub mod metrics;
pub mod providers;

pub use context::{build_health_context, SYSTEM_INSTRUCTIONS};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
