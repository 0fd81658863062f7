//! Status messages returned in `{ "message": ... }` bodies.
//!
//! Clients compare these strings verbatim, so they are part of the wire contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SUBMIT_SUCCESS: &str = "Successfully saved the selected care services.";
pub const MISSING_INFORMATION: &str = "Missing information in the request.";
pub const INVALID_JSON: &str = "Invalid JSON in the request.";
pub const PATIENT_NOT_FOUND: &str = "Patient not found.";
pub const STATION_NOT_FOUND: &str = "Station not found.";
pub const CARE_SERVICE_OPTION_NOT_FOUND: &str = "Care service option not found.";
pub const CLASSIFICATION_NOT_FOUND: &str = "Classification not found.";
pub const ALREADY_CLASSIFIED: &str = "A classification for this patient already exists for today.";
pub const INVALID_DATE: &str = "Invalid date, expected YYYY-MM-DD.";
pub const INVALID_IDENTIFIER: &str = "Invalid identifier in the URL.";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed.";
pub const INTERNAL_ERROR: &str = "Internal error";

/// Body of every status and error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
