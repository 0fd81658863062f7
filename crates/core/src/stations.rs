//! Station overview: stations, their patients, and past classifications.

use crate::clock::Clock;
use crate::constants::DATE_FORMAT;
use crate::db::Database;
use crate::models::Patient;
use crate::repositories::{catalog, classification, directory};
use crate::{ClassificationError, ClassificationResult};
use api_shared::{
    ClassificationDetailRes, ClassificationResultRes, ListStationsRes, StationPatientRes,
    StationPatientsRes, StationRes,
};
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Clone)]
pub struct StationService {
    db: Database,
    clock: Arc<dyn Clock>,
}

fn patient_res(patient: Patient, daily_today: bool) -> StationPatientRes {
    StationPatientRes {
        id: patient.id,
        first_name: patient.first_name,
        last_name: patient.last_name,
        daily_today,
        station_id: patient.station_id,
    }
}

/// Parses a `YYYY-MM-DD` path segment.
pub fn parse_date(raw: &str) -> ClassificationResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ClassificationError::InvalidDate(raw.to_string()))
}

impl StationService {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn list_stations(&self) -> ClassificationResult<ListStationsRes> {
        let stations = self.db.with_conn(directory::list_stations)?;
        Ok(ListStationsRes {
            stations: stations
                .into_iter()
                .map(|s| StationRes {
                    id: s.id,
                    name: s.name,
                    is_intensive_care: s.is_intensive_care,
                    is_child_care_unit: s.is_child_care_unit,
                    patients_per_caregiver_ratio: s.patients_per_caregiver_ratio,
                })
                .collect(),
        })
    }

    /// Patients on `station_id`, flagged when they already have a classification today.
    pub fn station_patients(&self, station_id: i64) -> ClassificationResult<StationPatientsRes> {
        let today = self.clock.today();
        self.db.with_conn(|conn| {
            directory::find_station(conn, station_id)?
                .ok_or(ClassificationError::StationNotFound(station_id))?;

            let classified = classification::patients_classified_on(conn, today)?;
            let patients = directory::list_patients_on_station(conn, station_id)?
                .into_iter()
                .map(|p| {
                    let daily_today = classified.contains(&p.id);
                    patient_res(p, daily_today)
                })
                .collect();

            Ok(StationPatientsRes {
                station_id,
                patients,
            })
        })
    }

    /// A patient's classification on `date`, as recorded on `station_id`.
    ///
    /// # Errors
    ///
    /// - [`ClassificationError::InvalidDate`] if `date` is not `YYYY-MM-DD`,
    /// - [`ClassificationError::StationNotFound`] / [`ClassificationError::PatientNotFound`],
    /// - [`ClassificationError::ClassificationNotFound`] if the patient was not classified on
    ///   that station that day.
    pub fn classification_detail(
        &self,
        station_id: i64,
        patient_id: i64,
        date: &str,
    ) -> ClassificationResult<ClassificationDetailRes> {
        let date = parse_date(date)?;
        let today = self.clock.today();

        self.db.with_conn(|conn| {
            directory::find_station(conn, station_id)?
                .ok_or(ClassificationError::StationNotFound(station_id))?;
            let patient = directory::find_patient(conn, patient_id)?
                .ok_or(ClassificationError::PatientNotFound(patient_id))?;

            let not_found = ClassificationError::ClassificationNotFound { patient_id, date };
            let record = match classification::find_for_patient_on(conn, patient_id, date)? {
                Some(record) if record.station_id == station_id => record,
                _ => return Err(not_found),
            };

            let selected = classification::selected_option_ids(conn, record.id)?;
            let options = catalog::list_options(conn)?
                .iter()
                .map(|option| option.to_question(selected.contains(&option.id)))
                .collect();

            let stay = directory::transfer_covering(conn, patient_id, date)?;
            let is_day_of_admission = stay.as_ref().is_some_and(|t| t.admission_date == date);
            let is_day_of_discharge = stay.as_ref().is_some_and(|t| t.discharge_date == Some(date));

            let daily_today = classification::find_for_patient_on(conn, patient_id, today)?.is_some();

            Ok(ClassificationDetailRes {
                patient: patient_res(patient, daily_today),
                station_id,
                date,
                is_day_of_admission,
                is_day_of_discharge,
                is_in_isolation: record.is_in_isolation,
                data_accepted: record.data_accepted,
                visit_type: record.visit_type,
                room_name: record.room_name,
                bed_number: record.bed_number,
                result: ClassificationResultRes {
                    category1: format!("A{}", record.general_level.get()),
                    category2: format!("S{}", record.special_level.get()),
                    minutes: record.result_minutes,
                },
                options,
            })
        })
    }
}
