//! Validated value types shared by the PPR crates.

use std::str::FromStr;

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// A severity outside of 1..=4
    #[error("severity must be between 1 and 4, got {0}")]
    SeverityOutOfRange(i64),
    #[error("unknown visit type: {0}")]
    UnknownVisitType(String),
    #[error("unknown care area: {0}")]
    UnknownCareArea(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TypeError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Severity of a care service option, from 1 (lowest) to 4 (highest).
///
/// The severity of the most demanding option selected in a care area decides the
/// care level (A1..A4 or S1..S4) for that area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(4);

    pub fn new(value: i64) -> Result<Self, TypeError> {
        if (1..=4).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(TypeError::SeverityOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl serde::Serialize for Severity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Severity::new(value).map_err(serde::de::Error::custom)
    }
}

/// Nature of the patient's stay on the classified day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    Regular,
    Admission,
    Discharge,
    AdmissionAndDischarge,
    DayPatient,
}

impl VisitType {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitType::Regular => "regular",
            VisitType::Admission => "admission",
            VisitType::Discharge => "discharge",
            VisitType::AdmissionAndDischarge => "admission_and_discharge",
            VisitType::DayPatient => "day_patient",
        }
    }

    /// Whether the classified day is the day the patient was admitted.
    pub fn includes_admission(self) -> bool {
        matches!(
            self,
            VisitType::Admission | VisitType::AdmissionAndDischarge | VisitType::DayPatient
        )
    }
}

impl FromStr for VisitType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(VisitType::Regular),
            "admission" => Ok(VisitType::Admission),
            "discharge" => Ok(VisitType::Discharge),
            "admission_and_discharge" => Ok(VisitType::AdmissionAndDischarge),
            "day_patient" => Ok(VisitType::DayPatient),
            other => Err(TypeError::UnknownVisitType(other.to_string())),
        }
    }
}

impl std::fmt::Display for VisitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Care area a questionnaire field contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareArea {
    /// General care (A levels)
    General,
    /// Special care (S levels)
    Special,
}

impl CareArea {
    pub fn as_str(self) -> &'static str {
        match self {
            CareArea::General => "general",
            CareArea::Special => "special",
        }
    }
}

impl FromStr for CareArea {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(CareArea::General),
            "special" => Ok(CareArea::Special),
            other => Err(TypeError::UnknownCareArea(other.to_string())),
        }
    }
}
