//! Wire types for the station overview endpoints.

use crate::QuestionRes;
use chrono::NaiveDate;
use ppr_types::VisitType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationRes {
    pub id: i64,
    pub name: String,
    pub is_intensive_care: bool,
    pub is_child_care_unit: bool,
    pub patients_per_caregiver_ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListStationsRes {
    pub stations: Vec<StationRes>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationPatientRes {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// A classification exists for the patient today.
    pub daily_today: bool,
    pub station_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationPatientsRes {
    pub station_id: i64,
    pub patients: Vec<StationPatientRes>,
}

/// Care levels and minutes of a classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResultRes {
    /// General care level, `A1`..`A4`
    pub category1: String,
    /// Special care level, `S1`..`S4`
    pub category2: String,
    pub minutes: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationDetailRes {
    pub patient: StationPatientRes,
    pub station_id: i64,
    pub date: NaiveDate,
    pub is_day_of_admission: bool,
    pub is_day_of_discharge: bool,
    pub is_in_isolation: bool,
    pub data_accepted: bool,
    pub visit_type: VisitType,
    pub room_name: String,
    pub bed_number: String,
    pub result: ClassificationResultRes,
    pub options: Vec<QuestionRes>,
}
