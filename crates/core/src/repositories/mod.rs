//! Table access for the classification store.
//!
//! Functions here take a plain `&Connection` so they can run either directly or inside a
//! [`rusqlite::Transaction`] opened by a service.

pub mod catalog;
pub mod classification;
pub mod directory;

use crate::constants::DATE_FORMAT;
use crate::ClassificationError;
use chrono::NaiveDate;
use ppr_types::Severity;
use rusqlite::types::Type;

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored date column, reporting the column index on failure.
pub(crate) fn parse_date_column(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(ClassificationError::CorruptRow(format!(
                "invalid date: {value}"
            ))),
        )
    })
}

pub(crate) fn severity_column(idx: usize, value: i64) -> rusqlite::Result<Severity> {
    Severity::new(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// Maps a text column through `FromStr`, for enum-valued columns.
pub(crate) fn parse_text_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
