//! Patients, stations and transfer records.

use super::{format_date, parse_date_column};
use crate::models::{Patient, PatientTransfer, Station};
use crate::ClassificationResult;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn map_station(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get("id")?,
        name: row.get("name")?,
        is_intensive_care: row.get("is_intensive_care")?,
        is_child_care_unit: row.get("is_child_care_unit")?,
        patients_per_caregiver_ratio: row.get("patients_per_caregiver_ratio")?,
    })
}

fn map_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        station_id: row.get("station_id")?,
    })
}

fn map_transfer(row: &Row<'_>) -> rusqlite::Result<PatientTransfer> {
    let admission: String = row.get("admission_date")?;
    let discharge: Option<String> = row.get("discharge_date")?;
    Ok(PatientTransfer {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        admission_date: parse_date_column(2, &admission)?,
        discharge_date: discharge
            .as_deref()
            .map(|d| parse_date_column(3, d))
            .transpose()?,
    })
}

pub fn find_patient(conn: &Connection, id: i64) -> ClassificationResult<Option<Patient>> {
    let patient = conn
        .query_row("SELECT * FROM patients WHERE id = ?1", [id], map_patient)
        .optional()?;
    Ok(patient)
}

pub fn find_station(conn: &Connection, id: i64) -> ClassificationResult<Option<Station>> {
    let station = conn
        .query_row("SELECT * FROM stations WHERE id = ?1", [id], map_station)
        .optional()?;
    Ok(station)
}

pub fn list_stations(conn: &Connection) -> ClassificationResult<Vec<Station>> {
    let mut stmt = conn.prepare("SELECT * FROM stations ORDER BY id")?;
    let rows = stmt.query_map([], map_station)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Patients currently assigned to `station_id`, ordered by id.
pub fn list_patients_on_station(
    conn: &Connection,
    station_id: i64,
) -> ClassificationResult<Vec<Patient>> {
    let mut stmt = conn.prepare("SELECT * FROM patients WHERE station_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map([station_id], map_patient)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The patient's most recent stay, by admission date.
pub fn latest_transfer_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> ClassificationResult<Option<PatientTransfer>> {
    let transfer = conn
        .query_row(
            "SELECT id, patient_id, admission_date, discharge_date FROM patient_transfers
             WHERE patient_id = ?1
             ORDER BY admission_date DESC, id DESC
             LIMIT 1",
            [patient_id],
            map_transfer,
        )
        .optional()?;
    Ok(transfer)
}

/// The stay that includes `date`, if any. Open stays have no discharge date.
pub fn transfer_covering(
    conn: &Connection,
    patient_id: i64,
    date: NaiveDate,
) -> ClassificationResult<Option<PatientTransfer>> {
    let day = format_date(date);
    let transfer = conn
        .query_row(
            "SELECT id, patient_id, admission_date, discharge_date FROM patient_transfers
             WHERE patient_id = ?1
               AND admission_date <= ?2
               AND (discharge_date IS NULL OR discharge_date >= ?2)
             ORDER BY admission_date DESC, id DESC
             LIMIT 1",
            params![patient_id, day],
            map_transfer,
        )
        .optional()?;
    Ok(transfer)
}

pub fn upsert_station(conn: &Connection, station: &Station) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO stations (id, name, is_intensive_care, is_child_care_unit, patients_per_caregiver_ratio)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            is_intensive_care = excluded.is_intensive_care,
            is_child_care_unit = excluded.is_child_care_unit,
            patients_per_caregiver_ratio = excluded.patients_per_caregiver_ratio",
        params![
            station.id,
            station.name,
            station.is_intensive_care,
            station.is_child_care_unit,
            station.patients_per_caregiver_ratio,
        ],
    )?;
    Ok(())
}

pub fn upsert_patient(conn: &Connection, patient: &Patient) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, station_id) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            station_id = excluded.station_id",
        params![
            patient.id,
            patient.first_name,
            patient.last_name,
            patient.station_id
        ],
    )?;
    Ok(())
}

pub fn upsert_transfer(conn: &Connection, transfer: &PatientTransfer) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO patient_transfers (id, patient_id, admission_date, discharge_date)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            patient_id = excluded.patient_id,
            admission_date = excluded.admission_date,
            discharge_date = excluded.discharge_date",
        params![
            transfer.id,
            transfer.patient_id,
            format_date(transfer.admission_date),
            transfer.discharge_date.map(format_date),
        ],
    )?;
    Ok(())
}
