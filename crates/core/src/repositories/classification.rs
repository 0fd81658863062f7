//! Daily classifications and their selected-option links.

use super::{format_date, parse_date_column, parse_text_column, severity_column};
use crate::models::{DailyClassification, NewClassification};
use crate::{ClassificationError, ClassificationResult};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::collections::HashSet;

fn map_classification(row: &Row<'_>) -> rusqlite::Result<DailyClassification> {
    let date: String = row.get("date")?;
    let visit_type: String = row.get("visit_type")?;
    Ok(DailyClassification {
        id: row.get("id")?,
        patient_id: row.get("patient_id")?,
        station_id: row.get("station_id")?,
        date: parse_date_column(3, &date)?,
        is_in_isolation: row.get("is_in_isolation")?,
        data_accepted: row.get("data_accepted")?,
        result_minutes: row.get("result_minutes")?,
        general_level: severity_column(7, row.get("general_level")?)?,
        special_level: severity_column(8, row.get("special_level")?)?,
        room_name: row.get("room_name")?,
        bed_number: row.get("bed_number")?,
        visit_type: parse_text_column(11, &visit_type)?,
        barthel_index: row.get("barthel_index")?,
        expanded_barthel_index: row.get("expanded_barthel_index")?,
        mini_mental_status: row.get("mini_mental_status")?,
    })
}

/// The patient's classification for `date`. At most one exists per patient and day.
pub fn find_for_patient_on(
    conn: &Connection,
    patient_id: i64,
    date: NaiveDate,
) -> ClassificationResult<Option<DailyClassification>> {
    let classification = conn
        .query_row(
            "SELECT * FROM daily_classifications WHERE patient_id = ?1 AND date = ?2",
            params![patient_id, format_date(date)],
            map_classification,
        )
        .optional()?;
    Ok(classification)
}

/// Ids of the care service options selected in a classification.
pub fn selected_option_ids(
    conn: &Connection,
    classification_id: i64,
) -> ClassificationResult<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT care_service_option_id FROM is_care_service_used WHERE classification_id = ?1",
    )?;
    let rows = stmt.query_map([classification_id], |row| row.get::<_, i64>(0))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

/// Ids of the patients that have a classification on `date`.
pub fn patients_classified_on(
    conn: &Connection,
    date: NaiveDate,
) -> ClassificationResult<HashSet<i64>> {
    let mut stmt = conn.prepare("SELECT patient_id FROM daily_classifications WHERE date = ?1")?;
    let rows = stmt.query_map([format_date(date)], |row| row.get::<_, i64>(0))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

/// Inserts a classification and returns its id.
///
/// A second classification for the same patient and day violates the unique constraint and is
/// reported as [`ClassificationError::AlreadyClassified`].
pub fn insert(conn: &Connection, new: &NewClassification<'_>) -> ClassificationResult<i64> {
    let result = conn.execute(
        "INSERT INTO daily_classifications (
            patient_id, station_id, date, is_in_isolation, data_accepted, result_minutes,
            general_level, special_level, room_name, bed_number, visit_type,
            barthel_index, expanded_barthel_index, mini_mental_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            new.patient_id,
            new.station_id,
            format_date(new.date),
            new.is_in_isolation,
            new.data_accepted,
            new.result_minutes,
            new.general_level.get(),
            new.special_level.get(),
            new.room_name,
            new.bed_number,
            new.visit_type.as_str(),
            new.barthel_index,
            new.expanded_barthel_index,
            new.mini_mental_status,
            Utc::now().to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            if find_for_patient_on(conn, new.patient_id, new.date)?.is_some() {
                Err(ClassificationError::AlreadyClassified {
                    patient_id: new.patient_id,
                    date: new.date,
                })
            } else {
                Err(ClassificationError::Database(rusqlite::Error::SqliteFailure(
                    e, None,
                )))
            }
        }
        Err(e) => Err(e.into()),
    }
}

pub fn insert_option_link(
    conn: &Connection,
    classification_id: i64,
    care_service_option_id: i64,
) -> ClassificationResult<()> {
    conn.execute(
        "INSERT INTO is_care_service_used (classification_id, care_service_option_id)
         VALUES (?1, ?2)",
        params![classification_id, care_service_option_id],
    )?;
    Ok(())
}
