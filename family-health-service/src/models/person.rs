//! Person model: a family member, human or canine.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Deserializes through `FromStr`, so query strings and stored values accept
/// the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Species {
    Human,
    Dog,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Dog => "dog",
        }
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "dog" | "canine" => Ok(Self::Dog),
            _ => Err(format!("Unknown species: {}", s)),
        }
    }
}

impl TryFrom<String> for Species {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A family member. Canine-only fields (`breed`, `microchip_id`) and the
/// human-only `blood_type` are left empty for the other species.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Person {
    #[sqlx(rename = "person_id")]
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub relationship: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<String>,
    pub blood_type: Option<String>,
    pub breed: Option<String>,
    pub microchip_id: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Person {
    pub fn species(&self) -> Species {
        self.species.parse().unwrap_or(Species::Human)
    }

    pub fn is_pet(&self) -> bool {
        self.species() != Species::Human
    }

    /// Age in whole years on `today`, if the birth date is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        if dob > today {
            return None;
        }
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

#[cfg(test)]
pub(crate) fn person_fixture(name: &str, species: Species) -> Person {
    Person {
        id: Uuid::new_v4(),
        name: name.to_string(),
        species: species.as_str().to_string(),
        relationship: None,
        date_of_birth: None,
        sex: None,
        blood_type: None,
        breed: None,
        microchip_id: None,
        notes: None,
        created_utc: Utc::now(),
        updated_utc: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years_only() {
        let mut person = person_fixture("Maya", Species::Human);
        person.date_of_birth = Some(date(2015, 6, 15));

        assert_eq!(person.age_on(date(2026, 6, 14)), Some(10));
        assert_eq!(person.age_on(date(2026, 6, 15)), Some(11));
    }

    #[test]
    fn age_is_unknown_without_birth_date_or_for_future_dates() {
        let mut person = person_fixture("Rex", Species::Dog);
        assert_eq!(person.age_on(date(2026, 1, 1)), None);

        person.date_of_birth = Some(date(2027, 1, 1));
        assert_eq!(person.age_on(date(2026, 1, 1)), None);
    }

    #[test]
    fn species_parses_canine_alias() {
        assert_eq!("Canine".parse::<Species>(), Ok(Species::Dog));
        assert!("cat".parse::<Species>().is_err());
    }

    #[test]
    fn species_deserializes_like_it_parses() {
        let dog: Species = serde_json::from_str(r#""Canine""#).expect("alias accepted");
        assert_eq!(dog, Species::Dog);
        let human: Species = serde_json::from_str(r#""human""#).expect("human accepted");
        assert_eq!(human, Species::Human);
        assert!(serde_json::from_str::<Species>(r#""cat""#).is_err());
        assert_eq!(serde_json::to_string(&Species::Dog).expect("serializes"), r#""dog""#);
    }
}
