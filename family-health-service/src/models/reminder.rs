//! Reminders: scheduled, optionally recurring tasks with a due date and status.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Due date of the occurrence after `due_on`. Month-based steps clamp to
    /// the last day of a shorter month (Jan 31 -> Feb 28).
    pub fn next_due(&self, due_on: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::None => None,
            Self::Daily => due_on.checked_add_days(Days::new(1)),
            Self::Weekly => due_on.checked_add_days(Days::new(7)),
            Self::Monthly => due_on.checked_add_months(Months::new(1)),
            Self::Yearly => due_on.checked_add_months(Months::new(12)),
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurrence: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Completed,
    Dismissed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Dismissed => "dismissed",
        }
    }
}

impl FromStr for ReminderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "dismissed" => Ok(Self::Dismissed),
            _ => Err(format!("Unknown reminder status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reminder {
    #[sqlx(rename = "reminder_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_on: NaiveDate,
    pub recurrence: String,
    pub status: String,
    pub completed_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
    #[sqlx(skip)]
    pub overdue: bool,
}

impl Reminder {
    pub fn status(&self) -> ReminderStatus {
        self.status.parse().unwrap_or(ReminderStatus::Pending)
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence.parse().unwrap_or(Recurrence::None)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status() == ReminderStatus::Pending && self.due_on < today
    }

    pub fn with_overdue(mut self, today: NaiveDate) -> Self {
        self.overdue = self.is_overdue(today);
        self
    }
}
