//! Validation and persistence of submitted questionnaire answers.
//!
//! A submission is checked in two passes. First every required key must be present; if any is
//! missing the request is rejected as a whole with the fixed missing-information message. Then
//! each value is type-checked and range-checked, and errors name the offending key.
//!
//! Writing happens in one transaction: the patient, the station and every selected option are
//! resolved, the care minutes are scored, and the classification and its option links are
//! inserted. Any failure rolls the whole submission back.

use crate::calculation::{CareMinutesCalculator, PprCalculator};
use crate::clock::Clock;
use crate::constants::{
    BARTHEL_INDEX_MAX, EXPANDED_BARTHEL_INDEX_MAX, MINI_MENTAL_STATUS_MAX,
    REQUIRED_SUBMISSION_KEYS,
};
use crate::db::Database;
use crate::models::{CatalogOption, NewClassification};
use crate::repositories::{catalog, classification, directory};
use crate::{ClassificationError, ClassificationResult};
use ppr_types::{NonEmptyText, VisitType};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// A validated classification submission.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub is_in_isolation: bool,
    pub data_accepted: bool,
    pub station_id: i64,
    pub room_name: NonEmptyText,
    pub bed_number: NonEmptyText,
    pub barthel_index: i64,
    pub expanded_barthel_index: i64,
    pub mini_mental_status: i64,
    /// Distinct option ids, in submission order.
    pub selected_care_services: Vec<i64>,
    pub visit_type: VisitType,
}

impl Submission {
    /// Validates a JSON request body.
    ///
    /// # Errors
    ///
    /// - [`ClassificationError::MalformedBody`] if the body is not a JSON object,
    /// - [`ClassificationError::MissingInformation`] if any required key is absent,
    /// - [`ClassificationError::InvalidValue`] if a value has the wrong type or range.
    pub fn from_json(body: &Value) -> ClassificationResult<Self> {
        let map = body.as_object().ok_or(ClassificationError::MalformedBody)?;
        if has_missing_data(map) {
            return Err(ClassificationError::MissingInformation);
        }

        Ok(Self {
            is_in_isolation: bool_value(map, "is_in_isolation")?,
            data_accepted: bool_value(map, "data_accepted")?,
            station_id: int_value(map, "station")?,
            room_name: text_value(map, "room_name")?,
            bed_number: bed_number_value(map)?,
            barthel_index: score_value(map, "barthel_index", BARTHEL_INDEX_MAX)?,
            expanded_barthel_index: score_value(
                map,
                "expanded_barthel_index",
                EXPANDED_BARTHEL_INDEX_MAX,
            )?,
            mini_mental_status: score_value(map, "mini_mental_status", MINI_MENTAL_STATUS_MAX)?,
            selected_care_services: selected_services_value(map)?,
            visit_type: visit_type_value(map)?,
        })
    }
}

fn has_missing_data(map: &Map<String, Value>) -> bool {
    REQUIRED_SUBMISSION_KEYS
        .iter()
        .any(|key| !map.contains_key(*key))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ClassificationError {
    ClassificationError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn bool_value(map: &Map<String, Value>, field: &'static str) -> ClassificationResult<bool> {
    map[field]
        .as_bool()
        .ok_or_else(|| invalid(field, "expected a boolean"))
}

fn int_value(map: &Map<String, Value>, field: &'static str) -> ClassificationResult<i64> {
    map[field]
        .as_i64()
        .ok_or_else(|| invalid(field, "expected an integer"))
}

fn score_value(
    map: &Map<String, Value>,
    field: &'static str,
    max: i64,
) -> ClassificationResult<i64> {
    let value = int_value(map, field)?;
    if !(0..=max).contains(&value) {
        return Err(invalid(field, format!("must be between 0 and {max}")));
    }
    Ok(value)
}

fn text_value(map: &Map<String, Value>, field: &'static str) -> ClassificationResult<NonEmptyText> {
    let raw = map[field]
        .as_str()
        .ok_or_else(|| invalid(field, "expected a string"))?;
    NonEmptyText::new(raw).map_err(|e| invalid(field, e.to_string()))
}

fn bed_number_value(map: &Map<String, Value>) -> ClassificationResult<NonEmptyText> {
    const FIELD: &str = "bed_number";
    match &map[FIELD] {
        Value::String(s) => NonEmptyText::new(s).map_err(|e| invalid(FIELD, e.to_string())),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            NonEmptyText::new(n.to_string()).map_err(|e| invalid(FIELD, e.to_string()))
        }
        _ => Err(invalid(FIELD, "expected a string or an integer")),
    }
}

fn selected_services_value(map: &Map<String, Value>) -> ClassificationResult<Vec<i64>> {
    const FIELD: &str = "selected_care_services";
    let entries = map[FIELD]
        .as_array()
        .ok_or_else(|| invalid(FIELD, "expected a list"))?;

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let id = entry
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| invalid(FIELD, "every entry needs an integer 'id'"))?;
        if seen.insert(id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn visit_type_value(map: &Map<String, Value>) -> ClassificationResult<VisitType> {
    const FIELD: &str = "visit_type";
    let raw = map[FIELD]
        .as_str()
        .ok_or_else(|| invalid(FIELD, "expected a string"))?;
    raw.parse::<VisitType>()
        .map_err(|e| invalid(FIELD, e.to_string()))
}

/// Writes daily classifications.
#[derive(Clone)]
pub struct SubmissionService {
    db: Database,
    clock: Arc<dyn Clock>,
    calculator: Arc<dyn CareMinutesCalculator>,
}

impl SubmissionService {
    /// Creates a service scoring with [`PprCalculator`].
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self::with_calculator(db, clock, Arc::new(PprCalculator))
    }

    pub fn with_calculator(
        db: Database,
        clock: Arc<dyn Clock>,
        calculator: Arc<dyn CareMinutesCalculator>,
    ) -> Self {
        Self {
            db,
            clock,
            calculator,
        }
    }

    /// Validates `body` and stores today's classification for `patient_id`.
    pub fn submit_json(&self, patient_id: i64, body: &Value) -> ClassificationResult<i64> {
        let submission = Submission::from_json(body).inspect_err(|e| {
            tracing::warn!("rejected submission for patient {}: {}", patient_id, e);
        })?;
        self.submit(patient_id, &submission)
    }

    /// Stores today's classification for `patient_id` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a `ClassificationError` if:
    /// - the patient or the station does not exist,
    /// - any selected option does not exist,
    /// - the patient already has a classification today,
    /// - a database operation fails.
    ///
    /// Nothing is written in any of these cases.
    pub fn submit(&self, patient_id: i64, submission: &Submission) -> ClassificationResult<i64> {
        let today = self.clock.today();

        let result = self.db.with_transaction(|tx| {
            directory::find_patient(tx, patient_id)?
                .ok_or(ClassificationError::PatientNotFound(patient_id))?;
            directory::find_station(tx, submission.station_id)?
                .ok_or(ClassificationError::StationNotFound(submission.station_id))?;

            if classification::find_for_patient_on(tx, patient_id, today)?.is_some() {
                return Err(ClassificationError::AlreadyClassified {
                    patient_id,
                    date: today,
                });
            }

            let selected = submission
                .selected_care_services
                .iter()
                .map(|&id| {
                    catalog::find_option(tx, id)?
                        .ok_or(ClassificationError::CareServiceOptionNotFound(id))
                })
                .collect::<ClassificationResult<Vec<CatalogOption>>>()?;

            let assessment = self.calculator.assess(submission, &selected);

            let classification_id = classification::insert(
                tx,
                &NewClassification {
                    patient_id,
                    station_id: submission.station_id,
                    date: today,
                    is_in_isolation: submission.is_in_isolation,
                    data_accepted: submission.data_accepted,
                    result_minutes: assessment.minutes,
                    general_level: assessment.general_level,
                    special_level: assessment.special_level,
                    room_name: submission.room_name.as_str(),
                    bed_number: submission.bed_number.as_str(),
                    visit_type: submission.visit_type,
                    barthel_index: submission.barthel_index,
                    expanded_barthel_index: submission.expanded_barthel_index,
                    mini_mental_status: submission.mini_mental_status,
                },
            )?;

            for option in &selected {
                classification::insert_option_link(tx, classification_id, option.id)?;
            }

            Ok((classification_id, assessment))
        });

        match result {
            Ok((classification_id, assessment)) => {
                tracing::info!(
                    "saved classification {} for patient {} on {}: {}/{} {} min",
                    classification_id,
                    patient_id,
                    today,
                    assessment.general_category(),
                    assessment.special_category(),
                    assessment.minutes
                );
                Ok(classification_id)
            }
            Err(e) => {
                tracing::warn!("submission for patient {} rolled back: {}", patient_id, e);
                Err(e)
            }
        }
    }
}
