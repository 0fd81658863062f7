//! # PPR Core
//!
//! Core business logic for the PPR patient classification system.
//!
//! This crate contains the data operations behind the daily classification workflow:
//! - the care-service catalog and the patient/station directory, stored in SQLite
//! - questionnaire assembly with the previous day's answers pre-selected
//! - validation, scoring and atomic persistence of submitted classifications
//! - the station overview read models
//!
//! **No API concerns**: HTTP servers and routing belong in `api-rest`; wire types live in
//! `api-shared`.

pub mod calculation;
pub mod clock;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod questionnaire;
pub mod reference_data;
pub mod repositories;
pub mod stations;
pub mod submission;

#[cfg(test)]
pub(crate) mod test_support;

pub use calculation::{CareAssessment, CareMinutesCalculator, PprCalculator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use constants::{DEFAULT_DATABASE_PATH, DEFAULT_REST_ADDR};
pub use db::Database;
pub use error::{ClassificationError, ClassificationResult};
pub use questionnaire::QuestionnaireService;
pub use reference_data::{ImportSummary, ReferenceData};
pub use stations::StationService;
pub use submission::{Submission, SubmissionService};
pub use ppr_types::{NonEmptyText, VisitType};
