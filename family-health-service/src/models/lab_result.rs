//! Lab results and their component measurements.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LabResult {
    #[sqlx(rename = "lab_result_id")]
    pub id: Uuid,
    pub person_id: Uuid,
    pub test_name: String,
    pub collected_on: NaiveDate,
    pub lab_name: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabFlag {
    Low,
    Normal,
    High,
}

impl LabFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LabComponent {
    #[sqlx(rename = "lab_component_id")]
    pub id: Uuid,
    pub lab_result_id: Uuid,
    pub name: String,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub unit: Option<String>,
    pub reference_low: Option<f64>,
    pub reference_high: Option<f64>,
    #[sqlx(skip)]
    pub flag: Option<LabFlag>,
}

impl LabComponent {
    /// Compares the numeric value against whichever reference bounds exist.
    /// `Normal` needs both bounds; a single bound can only flag a breach.
    pub fn compute_flag(&self) -> Option<LabFlag> {
        let value = self.value?;
        if let Some(low) = self.reference_low {
            if value < low {
                return Some(LabFlag::Low);
            }
        }
        if let Some(high) = self.reference_high {
            if value > high {
                return Some(LabFlag::High);
            }
        }
        match (self.reference_low, self.reference_high) {
            (Some(_), Some(_)) => Some(LabFlag::Normal),
            _ => None,
        }
    }

    pub fn with_flag(mut self) -> Self {
        self.flag = self.compute_flag();
        self
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self.compute_flag(), Some(LabFlag::Low | LabFlag::High))
    }

    /// Value as shown to people: numeric value with unit, or the text value.
    pub fn display_value(&self) -> String {
        let value = match (self.value, &self.value_text) {
            (Some(v), _) => format_number(v),
            (None, Some(text)) => text.clone(),
            (None, None) => "n/a".to_string(),
        };
        match &self.unit {
            Some(unit) if !unit.is_empty() => format!("{} {}", value, unit),
            _ => value,
        }
    }
}

/// Prints integral values without a trailing `.0`.
pub(crate) fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabResultWithComponents {
    #[serde(flatten)]
    pub result: LabResult,
    pub components: Vec<LabComponent>,
}

#[cfg(test)]
pub(crate) fn component_fixture(
    name: &str,
    value: Option<f64>,
    low: Option<f64>,
    high: Option<f64>,
) -> LabComponent {
    LabComponent {
        id: Uuid::new_v4(),
        lab_result_id: Uuid::new_v4(),
        name: name.to_string(),
        value,
        value_text: None,
        unit: Some("mg/dL".to_string()),
        reference_low: low,
        reference_high: high,
        flag: None,
    }
}
