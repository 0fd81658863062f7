//! Care-minute scoring.
//!
//! A classification is scored per care area: the most demanding option selected in the
//! general area sets the A level, the one in the special area sets the S level. Each level
//! maps to a fixed number of minutes, on top of a per-day base value and a once-per-stay case
//! value on the day of admission.

use crate::constants::{BASE_MINUTES, CASE_MINUTES, GENERAL_LEVEL_MINUTES, SPECIAL_LEVEL_MINUTES};
use crate::models::CatalogOption;
use crate::submission::Submission;
use ppr_types::{CareArea, Severity};

/// Outcome of scoring one classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CareAssessment {
    pub general_level: Severity,
    pub special_level: Severity,
    pub minutes: i64,
}

impl CareAssessment {
    /// `A1`..`A4`
    pub fn general_category(&self) -> String {
        format!("A{}", self.general_level.get())
    }

    /// `S1`..`S4`
    pub fn special_category(&self) -> String {
        format!("S{}", self.special_level.get())
    }
}

/// Computes care minutes for a validated submission and its resolved options.
///
/// Implementations must be pure: the writer calls them inside the submission transaction.
pub trait CareMinutesCalculator: Send + Sync {
    fn assess(&self, submission: &Submission, selected: &[CatalogOption]) -> CareAssessment;
}

/// Level and minute tables after the PPR 2.0 adult scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct PprCalculator;

impl PprCalculator {
    fn level_for(area: CareArea, selected: &[CatalogOption]) -> Severity {
        selected
            .iter()
            .filter(|option| option.area == area)
            .map(|option| option.severity)
            .max()
            .unwrap_or(Severity::MIN)
    }
}

impl CareMinutesCalculator for PprCalculator {
    fn assess(&self, submission: &Submission, selected: &[CatalogOption]) -> CareAssessment {
        let general_level = Self::level_for(CareArea::General, selected);
        let special_level = Self::level_for(CareArea::Special, selected);

        let mut minutes = BASE_MINUTES
            + GENERAL_LEVEL_MINUTES[usize::from(general_level.get() - 1)]
            + SPECIAL_LEVEL_MINUTES[usize::from(special_level.get() - 1)];
        if submission.visit_type.includes_admission() {
            minutes += CASE_MINUTES;
        }

        CareAssessment {
            general_level,
            special_level,
            minutes,
        }
    }
}
