//! Import of catalog and directory data from YAML.
//!
//! ```yaml
//! fields:
//!   - { id: 1, name: Körperpflege, short: KP, area: general }
//! categories:
//!   - { id: 1, name: Grundleistung }
//! options:
//!   - { id: 1, field_id: 1, category_id: 1, name: Teilwäsche, severity: 2 }
//! stations:
//!   - { id: 1, name: Station 1, patients_per_caregiver_ratio: 1.6 }
//! patients:
//!   - { id: 1, first_name: Alice, last_name: Smith, station_id: 1 }
//! transfers:
//!   - { id: 1, patient_id: 1, admission_date: 2026-10-15 }
//! ```
//!
//! Every section is optional. Rows are upserted by id, so importing the same file twice is a
//! no-op. The whole import runs in one transaction.

use crate::models::{CareServiceOption, Category, Field, Patient, PatientTransfer, Station};
use crate::repositories::{catalog, directory};
use crate::{ClassificationError, ClassificationResult, Database};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub options: Vec<CareServiceOption>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub transfers: Vec<PatientTransfer>,
}

/// Row counts written by an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub options: usize,
    pub stations: usize,
    pub patients: usize,
    pub transfers: usize,
}

impl ReferenceData {
    pub fn from_yaml_str(raw: &str) -> ClassificationResult<Self> {
        serde_yaml::from_str(raw).map_err(ClassificationError::ReferenceDataParse)
    }

    pub fn from_file(path: &Path) -> ClassificationResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(ClassificationError::ReferenceDataRead)?;
        Self::from_yaml_str(&raw)
    }

    /// Upserts every row into `db`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::ReferenceDataInvalid`] if an option names an unknown field
    /// or category, a patient an unknown station, or a transfer an unknown patient. Nothing is
    /// written in that case.
    pub fn import(&self, db: &Database) -> ClassificationResult<ImportSummary> {
        let summary = db.with_transaction(|tx| {
            for field in &self.fields {
                catalog::upsert_field(tx, field)?;
            }
            for category in &self.categories {
                catalog::upsert_category(tx, category)?;
            }
            for option in &self.options {
                if !catalog::field_exists(tx, option.field_id)? {
                    return Err(ClassificationError::ReferenceDataInvalid(format!(
                        "option {} references unknown field {}",
                        option.id, option.field_id
                    )));
                }
                if !catalog::category_exists(tx, option.category_id)? {
                    return Err(ClassificationError::ReferenceDataInvalid(format!(
                        "option {} references unknown category {}",
                        option.id, option.category_id
                    )));
                }
                catalog::upsert_option(tx, option)?;
            }

            for station in &self.stations {
                directory::upsert_station(tx, station)?;
            }
            for patient in &self.patients {
                if let Some(station_id) = patient.station_id {
                    if directory::find_station(tx, station_id)?.is_none() {
                        return Err(ClassificationError::ReferenceDataInvalid(format!(
                            "patient {} references unknown station {}",
                            patient.id, station_id
                        )));
                    }
                }
                directory::upsert_patient(tx, patient)?;
            }
            for transfer in &self.transfers {
                if directory::find_patient(tx, transfer.patient_id)?.is_none() {
                    return Err(ClassificationError::ReferenceDataInvalid(format!(
                        "transfer {} references unknown patient {}",
                        transfer.id, transfer.patient_id
                    )));
                }
                directory::upsert_transfer(tx, transfer)?;
            }

            Ok(ImportSummary {
                options: self.options.len(),
                stations: self.stations.len(),
                patients: self.patients.len(),
                transfers: self.transfers.len(),
            })
        })?;

        tracing::info!(
            "imported reference data: {} options, {} stations, {} patients, {} transfers",
            summary.options,
            summary.stations,
            summary.patients,
            summary.transfers
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::catalog::list_options;
    use crate::test_support::REFERENCE_YAML;
    use tempfile::TempDir;

    #[test]
    fn import_is_repeatable() {
        let db = Database::open_in_memory().unwrap();
        let data = ReferenceData::from_yaml_str(REFERENCE_YAML).unwrap();

        let first = data.import(&db).unwrap();
        let second = data.import(&db).unwrap();
        assert_eq!(first, second);

        let options = db.with_conn(list_options).unwrap();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].description, "Hilfe beim Waschen");
        assert_eq!(options[1].description, "");
    }

    #[test]
    fn severity_out_of_range_fails_to_parse() {
        let raw = "options:\n  - { id: 1, field_id: 1, category_id: 1, name: X, severity: 5 }\n";
        let err = ReferenceData::from_yaml_str(raw).expect_err("expected parse failure");
        assert!(matches!(err, ClassificationError::ReferenceDataParse(_)));
    }

    #[test]
    fn unknown_field_rolls_back_the_import() {
        let db = Database::open_in_memory().unwrap();
        let raw = r#"
categories:
  - { id: 1, name: Grundleistung }
options:
  - { id: 1, field_id: 9, category_id: 1, name: X, severity: 1 }
"#;
        let err = ReferenceData::from_yaml_str(raw)
            .unwrap()
            .import(&db)
            .expect_err("expected unknown field to fail");
        assert!(matches!(err, ClassificationError::ReferenceDataInvalid(_)));

        let categories: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(categories, 0);
    }

    #[test]
    fn reads_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("reference.yaml");
        std::fs::write(&path, REFERENCE_YAML).unwrap();

        let data = ReferenceData::from_file(&path).unwrap();
        assert_eq!(data.patients.len(), 3);
        assert_eq!(data.transfers[0].discharge_date, None);
    }
}
