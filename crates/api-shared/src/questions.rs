//! Wire types for `/questions/{patient_id}`.

use chrono::NaiveDate;
use ppr_types::VisitType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One care service option as shown in the questionnaire.
///
/// Field names follow the flattened `field__name` style the frontend already consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionRes {
    pub id: i64,
    #[serde(rename = "field__name")]
    pub field_name: String,
    #[serde(rename = "field__short")]
    pub field_short: String,
    #[serde(rename = "category__name")]
    pub category_name: String,
    pub name: String,
    pub severity: u8,
    pub description: String,
    /// Whether the option was selected in the classification being displayed against.
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionsRes {
    pub questions: Vec<QuestionRes>,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    /// Visit type of today's classification, if one was already submitted.
    pub visit_type: Option<VisitType>,
}

/// Reference to a selected option. Extra keys sent by clients are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectedCareServiceReq {
    pub id: i64,
}

/// Documented shape of the submission body.
///
/// Submissions are validated key by key from the raw JSON object so that a missing key
/// yields the missing-information message instead of a generic decoding error; this type
/// describes the accepted body for the OpenAPI document and for client code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmitClassificationReq {
    pub is_in_isolation: bool,
    pub data_accepted: bool,
    pub station: i64,
    pub room_name: String,
    /// String or integer
    pub bed_number: String,
    pub barthel_index: i64,
    pub expanded_barthel_index: i64,
    pub mini_mental_status: i64,
    pub selected_care_services: Vec<SelectedCareServiceReq>,
    pub visit_type: VisitType,
}
