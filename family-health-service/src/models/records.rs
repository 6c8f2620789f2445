use super::{
    Allergy, Appointment, Document, LabResultWithComponents, Medication, Person, Reminder,
    Vaccine, Vital,
};
use serde::Serialize;

/// A person together with every record they own.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyRecord {
    #[serde(flatten)]
    pub person: Person,
    pub allergies: Vec<Allergy>,
    pub medications: Vec<Medication>,
    pub vaccines: Vec<Vaccine>,
    pub vitals: Vec<Vital>,
    pub lab_results: Vec<LabResultWithComponents>,
    pub reminders: Vec<Reminder>,
    pub documents: Vec<Document>,
    pub appointments: Vec<Appointment>,
}

impl FamilyRecord {
    pub fn new(person: Person) -> Self {
        Self {
            person,
            allergies: Vec::new(),
            medications: Vec::new(),
            vaccines: Vec::new(),
            vitals: Vec::new(),
            lab_results: Vec::new(),
            reminders: Vec::new(),
            documents: Vec::new(),
            appointments: Vec::new(),
        }
    }
}
