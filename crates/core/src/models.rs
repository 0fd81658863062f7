//! Records persisted by the classification store.

use api_shared::QuestionRes;
use chrono::NaiveDate;
use ppr_types::{CareArea, Severity, VisitType};
use serde::Deserialize;

/// A questionnaire field, e.g. "Körperpflege" (`KP`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Field {
    pub id: i64,
    pub name: String,
    pub short: String,
    pub area: CareArea,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Reference row as stored; see [`CatalogOption`] for the joined view.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CareServiceOption {
    pub id: i64,
    pub field_id: i64,
    pub category_id: i64,
    pub name: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

/// A care service option joined with its field and category.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogOption {
    pub id: i64,
    pub field_name: String,
    pub field_short: String,
    pub area: CareArea,
    pub category_name: String,
    pub name: String,
    pub severity: Severity,
    pub description: String,
}

impl CatalogOption {
    pub fn to_question(&self, selected: bool) -> QuestionRes {
        QuestionRes {
            id: self.id,
            field_name: self.field_name.clone(),
            field_short: self.field_short.clone(),
            category_name: self.category_name.clone(),
            name: self.name.clone(),
            severity: self.severity.get(),
            description: self.description.clone(),
            selected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_intensive_care: bool,
    #[serde(default)]
    pub is_child_care_unit: bool,
    #[serde(default)]
    pub patients_per_caregiver_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub station_id: Option<i64>,
}

/// Admission and discharge of one stay.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PatientTransfer {
    pub id: i64,
    pub patient_id: i64,
    pub admission_date: NaiveDate,
    #[serde(default)]
    pub discharge_date: Option<NaiveDate>,
}

/// One patient's classification for one calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyClassification {
    pub id: i64,
    pub patient_id: i64,
    pub station_id: i64,
    pub date: NaiveDate,
    pub is_in_isolation: bool,
    pub data_accepted: bool,
    pub result_minutes: i64,
    pub general_level: Severity,
    pub special_level: Severity,
    pub room_name: String,
    pub bed_number: String,
    pub visit_type: VisitType,
    pub barthel_index: i64,
    pub expanded_barthel_index: i64,
    pub mini_mental_status: i64,
}

/// Values for a classification row that has not been written yet.
#[derive(Clone, Debug)]
pub struct NewClassification<'a> {
    pub patient_id: i64,
    pub station_id: i64,
    pub date: NaiveDate,
    pub is_in_isolation: bool,
    pub data_accepted: bool,
    pub result_minutes: i64,
    pub general_level: Severity,
    pub special_level: Severity,
    pub room_name: &'a str,
    pub bed_number: &'a str,
    pub visit_type: VisitType,
    pub barthel_index: i64,
    pub expanded_barthel_index: i64,
    pub mini_mental_status: i64,
}
