//! # API Shared
//!
//! Shared wire types for the PPR APIs.
//!
//! Contains:
//! - JSON request/response types (`questions` and `stations` modules)
//! - Shared services like `HealthService`
//! - The fixed response messages clients match on
//!
//! Used by `ppr-core` to build responses and by `api-rest` for OpenAPI schemas.

pub mod health;
pub mod messages;
pub mod questions;
pub mod stations;

pub use health::{HealthRes, HealthService};
pub use messages::MessageRes;
pub use questions::{QuestionRes, QuestionsRes, SelectedCareServiceReq, SubmitClassificationReq};
pub use stations::{
    ClassificationDetailRes, ClassificationResultRes, ListStationsRes, StationPatientRes,
    StationPatientsRes, StationRes,
};
