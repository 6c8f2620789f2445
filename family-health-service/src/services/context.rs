//! Builds the plain-text family health summary sent to the assistant.

use crate::models::{format_number, FamilyRecord, LabFlag, Person, ReminderStatus, Species};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Fixed preamble placed ahead of the records in the system prompt.
pub const SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant answering questions about a \
family's health records, including their pets. Answer using only the records below. If the \
records do not contain the answer, say so plainly. Do not diagnose; for medical decisions, \
suggest consulting a doctor or veterinarian. Keep answers short and specific.";

const RECENT_VACCINES: usize = 5;
const LAB_LOOKBACK_DAYS: u64 = 365;

/// Render every person's records into the system prompt.
pub fn build_health_context(records: &[FamilyRecord], now: DateTime<Utc>) -> String {
    let today = now.date_naive();
    let mut out = String::new();

    let _ = writeln!(out, "{}", SYSTEM_INSTRUCTIONS);
    let _ = writeln!(out);
    let _ = writeln!(out, "Today's date: {}", today);

    if records.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No family members have been recorded yet.");
        return out;
    }

    for record in records {
        let _ = writeln!(out);
        write_person(&mut out, record, now, today);
    }

    out
}

fn write_person(out: &mut String, record: &FamilyRecord, now: DateTime<Utc>, today: NaiveDate) {
    let _ = writeln!(out, "## {}", person_header(&record.person, today));

    if record.allergies.is_empty() {
        let _ = writeln!(out, "Allergies: none recorded");
    } else {
        let items: Vec<String> = record
            .allergies
            .iter()
            .map(|a| match &a.reaction {
                Some(reaction) => format!("{} ({}, {})", a.allergen, a.severity, reaction),
                None => format!("{} ({})", a.allergen, a.severity),
            })
            .collect();
        let _ = writeln!(out, "Allergies: {}", items.join("; "));
    }

    let active: Vec<String> = record
        .medications
        .iter()
        .filter(|m| m.active && m.end_date.map_or(true, |end| end >= today))
        .map(|m| {
            let mut line = m.name.clone();
            if let Some(dosage) = &m.dosage {
                let _ = write!(line, " {}", dosage);
            }
            if let Some(frequency) = &m.frequency {
                let _ = write!(line, ", {}", frequency);
            }
            line
        })
        .collect();
    if !active.is_empty() {
        let _ = writeln!(out, "Active medications: {}", active.join("; "));
    }

    let mut vaccines: Vec<_> = record.vaccines.iter().collect();
    vaccines.sort_by(|a, b| b.administered_on.cmp(&a.administered_on));
    if !vaccines.is_empty() {
        let items: Vec<String> = vaccines
            .iter()
            .take(RECENT_VACCINES)
            .map(|v| match v.next_due_on {
                Some(due) => format!("{} ({}, next due {})", v.name, v.administered_on, due),
                None => format!("{} ({})", v.name, v.administered_on),
            })
            .collect();
        let _ = writeln!(out, "Vaccines: {}", items.join("; "));

        // Older doses can still carry the next due date (multi-year boosters).
        let older_due: Vec<String> = vaccines
            .iter()
            .skip(RECENT_VACCINES)
            .filter_map(|v| v.next_due_on.map(|due| format!("{} {}", v.name, due)))
            .collect();
        if !older_due.is_empty() {
            let _ = writeln!(out, "Upcoming due dates: {}", older_due.join("; "));
        }
    }

    let mut latest = BTreeMap::new();
    for vital in &record.vitals {
        latest
            .entry(vital.kind.as_str())
            .and_modify(|current: &mut &crate::models::Vital| {
                if vital.measured_utc > current.measured_utc {
                    *current = vital;
                }
            })
            .or_insert(vital);
    }
    if !latest.is_empty() {
        let items: Vec<String> = latest
            .values()
            .map(|v| {
                format!(
                    "{} {} {} ({})",
                    v.kind,
                    format_number(v.value),
                    v.unit,
                    v.measured_utc.date_naive()
                )
            })
            .collect();
        let _ = writeln!(out, "Latest vitals: {}", items.join("; "));
    }

    let lab_cutoff = today
        .checked_sub_days(Days::new(LAB_LOOKBACK_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let mut labs: Vec<_> = record
        .lab_results
        .iter()
        .filter(|l| l.result.collected_on >= lab_cutoff)
        .collect();
    labs.sort_by(|a, b| b.result.collected_on.cmp(&a.result.collected_on));
    if !labs.is_empty() {
        let _ = writeln!(out, "Lab results (last 12 months):");
        for lab in labs {
            let components: Vec<String> = lab
                .components
                .iter()
                .map(|c| match c.compute_flag() {
                    Some(flag @ (LabFlag::Low | LabFlag::High)) => format!(
                        "{} {} [{}]",
                        c.name,
                        c.display_value(),
                        flag.as_str().to_uppercase()
                    ),
                    _ => format!("{} {}", c.name, c.display_value()),
                })
                .collect();
            if components.is_empty() {
                let _ = writeln!(out, "- {} ({})", lab.result.test_name, lab.result.collected_on);
            } else {
                let _ = writeln!(
                    out,
                    "- {} ({}): {}",
                    lab.result.test_name,
                    lab.result.collected_on,
                    components.join("; ")
                );
            }
        }
    }

    let mut reminders: Vec<_> = record
        .reminders
        .iter()
        .filter(|r| r.status() == ReminderStatus::Pending)
        .collect();
    reminders.sort_by_key(|r| r.due_on);
    if !reminders.is_empty() {
        let items: Vec<String> = reminders
            .iter()
            .map(|r| {
                let mut line = format!("{} due {}", r.title, r.due_on);
                if r.is_overdue(today) {
                    line.push_str(" (OVERDUE)");
                }
                line
            })
            .collect();
        let _ = writeln!(out, "Pending reminders: {}", items.join("; "));
    }

    let mut appointments: Vec<_> = record
        .appointments
        .iter()
        .filter(|a| a.status == "scheduled" && a.scheduled_utc >= now)
        .collect();
    appointments.sort_by_key(|a| a.scheduled_utc);
    if !appointments.is_empty() {
        let items: Vec<String> = appointments
            .iter()
            .map(|a| {
                let mut line = a.scheduled_utc.format("%Y-%m-%d %H:%M UTC").to_string();
                if let Some(doctor) = &a.doctor_name {
                    let _ = write!(line, " with {}", doctor);
                }
                if let Some(clinic) = &a.clinic_name {
                    let _ = write!(line, " at {}", clinic);
                }
                if let Some(reason) = &a.reason {
                    let _ = write!(line, " ({})", reason);
                }
                line
            })
            .collect();
        let _ = writeln!(out, "Upcoming appointments: {}", items.join("; "));
    }
}

fn person_header(person: &Person, today: NaiveDate) -> String {
    let species = person.species();
    let mut parts = vec![species.as_str().to_string()];
    if let Some(age) = person.age_on(today) {
        parts.push(format!("age {}", age));
    }
    if let Some(relationship) = &person.relationship {
        parts.push(relationship.clone());
    }
    if let Some(sex) = &person.sex {
        parts.push(sex.clone());
    }
    match species {
        Species::Human => {
            if let Some(blood_type) = &person.blood_type {
                parts.push(format!("blood type {}", blood_type));
            }
        }
        Species::Dog => {
            if let Some(breed) = &person.breed {
                parts.push(format!("breed {}", breed));
            }
        }
    }
    format!("{} ({})", person.name, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        component_fixture, person_fixture, Allergy, Appointment, LabResult,
        LabResultWithComponents, Medication, Reminder, Vaccine, Vital,
    };
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn medication(person_id: Uuid, name: &str, active: bool) -> Medication {
        Medication {
            id: Uuid::new_v4(),
            person_id,
            name: name.to_string(),
            dosage: Some("10 mg".to_string()),
            frequency: Some("daily".to_string()),
            start_date: None,
            end_date: None,
            prescribed_by: None,
            active,
            notes: None,
            created_utc: now(),
        }
    }

    fn vaccine(person_id: Uuid, name: &str, on: NaiveDate) -> Vaccine {
        Vaccine {
            id: Uuid::new_v4(),
            person_id,
            name: name.to_string(),
            administered_on: on,
            next_due_on: None,
            lot_number: None,
            administered_by: None,
            notes: None,
            created_utc: now(),
            updated_utc: now(),
        }
    }

    fn vital(person_id: Uuid, kind: &str, value: f64, at: DateTime<Utc>) -> Vital {
        Vital {
            id: Uuid::new_v4(),
            person_id,
            kind: kind.to_string(),
            value,
            unit: "kg".to_string(),
            measured_utc: at,
            notes: None,
        }
    }

    fn reminder(person_id: Uuid, title: &str, due_on: NaiveDate, status: &str) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            person_id,
            title: title.to_string(),
            description: None,
            due_on,
            recurrence: "none".to_string(),
            status: status.to_string(),
            completed_utc: None,
            created_utc: now(),
            overdue: false,
        }
    }

    #[test]
    fn empty_family_still_carries_instructions_and_date() {
        let context = build_health_context(&[], now());
        assert!(context.starts_with(SYSTEM_INSTRUCTIONS));
        assert!(context.contains("Today's date: 2026-10-18"));
        assert!(context.contains("No family members have been recorded yet."));
    }

    #[test]
    fn header_describes_species_specific_fields() {
        let mut maya = person_fixture("Maya", Species::Human);
        maya.date_of_birth = Some(date(2015, 6, 15));
        maya.blood_type = Some("O+".to_string());
        maya.breed = Some("ignored".to_string());

        let mut rex = person_fixture("Rex", Species::Dog);
        rex.date_of_birth = Some(date(2021, 3, 1));
        rex.breed = Some("Labrador".to_string());

        let context = build_health_context(
            &[FamilyRecord::new(maya), FamilyRecord::new(rex)],
            now(),
        );

        assert!(context.contains("## Maya (human, age 11, blood type O+)"));
        assert!(context.contains("## Rex (dog, age 5, breed Labrador)"));
        assert!(!context.contains("ignored"));
        assert!(context.contains("Allergies: none recorded"));
    }

    #[test]
    fn lists_allergies_and_only_active_medications() {
        let person = person_fixture("Sam", Species::Human);
        let id = person.id;
        let mut record = FamilyRecord::new(person);
        record.allergies.push(Allergy {
            id: Uuid::new_v4(),
            person_id: id,
            allergen: "Peanuts".to_string(),
            reaction: Some("hives".to_string()),
            severity: "severe".to_string(),
            noted_on: None,
            created_utc: now(),
        });
        record.medications.push(medication(id, "Cetirizine", true));
        record.medications.push(medication(id, "Amoxicillin", false));
        let mut ended = medication(id, "Prednisone", true);
        ended.end_date = Some(date(2026, 10, 1));
        record.medications.push(ended);

        let context = build_health_context(&[record], now());

        assert!(context.contains("Allergies: Peanuts (severe, hives)"));
        assert!(context.contains("Active medications: Cetirizine 10 mg, daily"));
        assert!(!context.contains("Amoxicillin"));
        assert!(!context.contains("Prednisone"));
    }

    #[test]
    fn keeps_five_most_recent_vaccines_with_due_dates() {
        let person = person_fixture("Rex", Species::Dog);
        let id = person.id;
        let mut record = FamilyRecord::new(person);
        for year in 2019..=2025 {
            record
                .vaccines
                .push(vaccine(id, &format!("Rabies {}", year), date(year, 4, 1)));
        }
        record.vaccines[6].next_due_on = Some(date(2026, 4, 1));

        let context = build_health_context(&[record], now());

        assert!(context.contains("Rabies 2025 (2025-04-01, next due 2026-04-01)"));
        assert!(context.contains("Rabies 2021"));
        assert!(!context.contains("Rabies 2020"));
        assert!(!context.contains("Rabies 2019"));
        assert!(!context.contains("Upcoming due dates"));
    }

    #[test]
    fn older_vaccine_due_dates_survive_the_recent_cut() {
        let person = person_fixture("Rex", Species::Dog);
        let id = person.id;
        let mut record = FamilyRecord::new(person);

        let mut rabies = vaccine(id, "Rabies 3yr", date(2024, 1, 1));
        rabies.next_due_on = Some(date(2027, 1, 1));
        record.vaccines.push(rabies);
        record
            .vaccines
            .push(vaccine(id, "Lepto 2023", date(2023, 6, 1)));
        for month in 1..=5 {
            record
                .vaccines
                .push(vaccine(id, &format!("DHPP booster {}", month), date(2026, month, 10)));
        }

        let context = build_health_context(&[record], now());

        assert!(context.contains("DHPP booster 1 (2026-01-10)"));
        assert!(!context.contains("Rabies 3yr (2024-01-01"));
        assert!(context.contains("Upcoming due dates: Rabies 3yr 2027-01-01\n"));
        assert!(!context.contains("Lepto 2023"));
    }

    #[test]
    fn reports_latest_reading_per_vital_kind() {
        let person = person_fixture("Rex", Species::Dog);
        let id = person.id;
        let mut record = FamilyRecord::new(person);
        record.vitals.push(vital(
            id,
            "weight",
            31.0,
            Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap(),
        ));
        record.vitals.push(vital(
            id,
            "weight",
            32.5,
            Utc.with_ymd_and_hms(2026, 9, 10, 0, 0, 0).unwrap(),
        ));

        let context = build_health_context(&[record], now());

        assert!(context.contains("Latest vitals: weight 32.5 kg (2026-09-10)"));
        assert!(!context.contains("31 kg"));
    }

    #[test]
    fn flags_out_of_range_lab_components_within_a_year() {
        let person = person_fixture("Dana", Species::Human);
        let id = person.id;
        let mut record = FamilyRecord::new(person);

        let lab = |name: &str, on: NaiveDate| LabResult {
            id: Uuid::new_v4(),
            person_id: id,
            test_name: name.to_string(),
            collected_on: on,
            lab_name: None,
            notes: None,
            created_utc: now(),
        };
        record.lab_results.push(LabResultWithComponents {
            result: lab("Lipid panel", date(2026, 5, 2)),
            components: vec![
                component_fixture("LDL", Some(130.0), Some(0.0), Some(100.0)),
                component_fixture("HDL", Some(55.0), Some(40.0), Some(90.0)),
            ],
        });
        record.lab_results.push(LabResultWithComponents {
            result: lab("Old panel", date(2024, 1, 1)),
            components: vec![],
        });

        let context = build_health_context(&[record], now());

        assert!(context
            .contains("- Lipid panel (2026-05-02): LDL 130 mg/dL [HIGH]; HDL 55 mg/dL"));
        assert!(!context.contains("Old panel"));
    }

    #[test]
    fn pending_reminders_sorted_with_overdue_marker() {
        let person = person_fixture("Maya", Species::Human);
        let id = person.id;
        let mut record = FamilyRecord::new(person);
        record
            .reminders
            .push(reminder(id, "Annual physical", date(2026, 11, 1), "pending"));
        record
            .reminders
            .push(reminder(id, "Dentist", date(2026, 9, 1), "pending"));
        record
            .reminders
            .push(reminder(id, "Eye exam", date(2026, 8, 1), "completed"));

        let context = build_health_context(&[record], now());

        assert!(context.contains(
            "Pending reminders: Dentist due 2026-09-01 (OVERDUE); Annual physical due 2026-11-01"
        ));
        assert!(!context.contains("Eye exam"));
    }

    #[test]
    fn only_future_scheduled_appointments_are_listed() {
        let person = person_fixture("Rex", Species::Dog);
        let id = person.id;
        let mut record = FamilyRecord::new(person);

        let appointment = |at: DateTime<Utc>, status: &str, reason: &str| Appointment {
            id: Uuid::new_v4(),
            person_id: id,
            doctor_id: None,
            doctor_name: Some("Dr. Lee".to_string()),
            clinic_id: None,
            clinic_name: Some("Riverside Vet".to_string()),
            scheduled_utc: at,
            reason: Some(reason.to_string()),
            status: status.to_string(),
            notes: None,
            created_utc: now(),
        };
        record.appointments.push(appointment(
            Utc.with_ymd_and_hms(2026, 11, 3, 14, 0, 0).unwrap(),
            "scheduled",
            "checkup",
        ));
        record.appointments.push(appointment(
            Utc.with_ymd_and_hms(2026, 9, 3, 14, 0, 0).unwrap(),
            "completed",
            "vaccination",
        ));
        record.appointments.push(appointment(
            Utc.with_ymd_and_hms(2026, 12, 3, 14, 0, 0).unwrap(),
            "cancelled",
            "grooming",
        ));

        let context = build_health_context(&[record], now());

        assert!(context.contains(
            "Upcoming appointments: 2026-11-03 14:00 UTC with Dr. Lee at Riverside Vet (checkup)"
        ));
        assert!(!context.contains("vaccination"));
        assert!(!context.contains("grooming"));
    }
}
