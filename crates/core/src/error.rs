#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("missing information in the request")]
    MissingInformation,
    #[error("request body is not a JSON object")]
    MalformedBody,
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("patient {0} not found")]
    PatientNotFound(i64),
    #[error("station {0} not found")]
    StationNotFound(i64),
    #[error("care service option {0} not found")]
    CareServiceOptionNotFound(i64),
    #[error("no classification for patient {patient_id} on {date}")]
    ClassificationNotFound {
        patient_id: i64,
        date: chrono::NaiveDate,
    },
    #[error("patient {patient_id} is already classified for {date}")]
    AlreadyClassified {
        patient_id: i64,
        date: chrono::NaiveDate,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    LockPoisoned,
    #[error("stored value is invalid: {0}")]
    CorruptRow(String),

    #[error("failed to read reference data file: {0}")]
    ReferenceDataRead(std::io::Error),
    #[error("failed to parse reference data: {0}")]
    ReferenceDataParse(serde_yaml::Error),
    #[error("reference data is invalid: {0}")]
    ReferenceDataInvalid(String),
}

impl ClassificationError {
    /// Errors caused by the caller's input rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClassificationError::InvalidInput(_)
                | ClassificationError::MissingInformation
                | ClassificationError::MalformedBody
                | ClassificationError::InvalidValue { .. }
                | ClassificationError::InvalidDate(_)
                | ClassificationError::PatientNotFound(_)
                | ClassificationError::StationNotFound(_)
                | ClassificationError::CareServiceOptionNotFound(_)
                | ClassificationError::ClassificationNotFound { .. }
                | ClassificationError::AlreadyClassified { .. }
        )
    }
}

pub type ClassificationResult<T> = std::result::Result<T, ClassificationError>;
