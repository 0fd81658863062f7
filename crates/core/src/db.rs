//! SQLite connection shared by the core services.
//!
//! A single connection sits behind a mutex. Every store operation holds the lock for its whole
//! duration, so a submission's check-then-insert sequence cannot interleave with another
//! request.

use crate::config::CoreConfig;
use crate::reference_data::ReferenceData;
use crate::{ClassificationError, ClassificationResult};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Schema migrations, applied in order. `PRAGMA user_version` records how many have run.
const MIGRATIONS: [&str; 1] = [r#"
    CREATE TABLE IF NOT EXISTS fields (
        id     INTEGER PRIMARY KEY,
        name   TEXT NOT NULL,
        short  TEXT NOT NULL,
        area   TEXT NOT NULL CHECK(area IN ('general','special'))
    );

    CREATE TABLE IF NOT EXISTS categories (
        id    INTEGER PRIMARY KEY,
        name  TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS care_service_options (
        id           INTEGER PRIMARY KEY,
        field_id     INTEGER NOT NULL REFERENCES fields(id),
        category_id  INTEGER NOT NULL REFERENCES categories(id),
        name         TEXT NOT NULL,
        severity     INTEGER NOT NULL CHECK(severity BETWEEN 1 AND 4),
        description  TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS stations (
        id                            INTEGER PRIMARY KEY,
        name                          TEXT NOT NULL,
        is_intensive_care             INTEGER NOT NULL DEFAULT 0,
        is_child_care_unit            INTEGER NOT NULL DEFAULT 0,
        patients_per_caregiver_ratio  REAL NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS patients (
        id          INTEGER PRIMARY KEY,
        first_name  TEXT NOT NULL,
        last_name   TEXT NOT NULL,
        station_id  INTEGER REFERENCES stations(id)
    );

    CREATE TABLE IF NOT EXISTS patient_transfers (
        id              INTEGER PRIMARY KEY,
        patient_id      INTEGER NOT NULL REFERENCES patients(id),
        admission_date  TEXT NOT NULL,
        discharge_date  TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_patient_transfers_patient
        ON patient_transfers(patient_id, admission_date);

    CREATE TABLE IF NOT EXISTS daily_classifications (
        id                      INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id              INTEGER NOT NULL REFERENCES patients(id),
        station_id              INTEGER NOT NULL REFERENCES stations(id),
        date                    TEXT NOT NULL,
        is_in_isolation         INTEGER NOT NULL,
        data_accepted           INTEGER NOT NULL,
        result_minutes          INTEGER NOT NULL,
        general_level           INTEGER NOT NULL CHECK(general_level BETWEEN 1 AND 4),
        special_level           INTEGER NOT NULL CHECK(special_level BETWEEN 1 AND 4),
        room_name               TEXT NOT NULL,
        bed_number              TEXT NOT NULL,
        visit_type              TEXT NOT NULL,
        barthel_index           INTEGER NOT NULL,
        expanded_barthel_index  INTEGER NOT NULL,
        mini_mental_status      INTEGER NOT NULL,
        created_at              TEXT NOT NULL,
        UNIQUE(patient_id, date)
    );

    CREATE TABLE IF NOT EXISTS is_care_service_used (
        classification_id       INTEGER NOT NULL REFERENCES daily_classifications(id),
        care_service_option_id  INTEGER NOT NULL REFERENCES care_service_options(id),
        PRIMARY KEY (classification_id, care_service_option_id)
    );
"#];

/// Handle to the classification store. Cloning shares the connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) the database file and applies pending migrations.
    pub fn open(path: &Path) -> ClassificationResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> ClassificationResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Opens the configured database and imports the configured reference data, if any.
    pub fn open_configured(cfg: &CoreConfig) -> ClassificationResult<Self> {
        let db = Self::open(cfg.database_path())?;
        if let Some(path) = cfg.reference_data() {
            let data = ReferenceData::from_file(path)?;
            data.import(&db)?;
        }
        Ok(db)
    }

    fn from_connection(mut conn: Connection) -> ClassificationResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        run_pending_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `func` with the connection locked.
    pub fn with_conn<F, T>(&self, func: F) -> ClassificationResult<T>
    where
        F: FnOnce(&Connection) -> ClassificationResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|_| ClassificationError::LockPoisoned)?;
        func(&guard)
    }

    /// Runs `func` inside a transaction, committing only if it returns `Ok`.
    ///
    /// On error the transaction is dropped, which rolls back every write `func` made.
    pub fn with_transaction<F, T>(&self, func: F) -> ClassificationResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> ClassificationResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| ClassificationError::LockPoisoned)?;
        let tx = guard.transaction()?;
        let value = func(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

fn run_pending_migrations(conn: &mut Connection) -> ClassificationResult<()> {
    let applied: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    let applied = usize::try_from(applied).unwrap_or(0);

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", (index + 1) as i64)?;
        tx.commit()?;
        tracing::info!("applied database migration {}", index + 1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reopening_a_database_keeps_schema_version() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("ppr.sqlite3");

        Database::open(&path).expect("first open should succeed");
        let db = Database::open(&path).expect("second open should succeed");

        let version: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(version, MIGRATIONS.len() as i64);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();

        let result: ClassificationResult<()> = db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO stations (id, name) VALUES (1, 'Station 1')",
                [],
            )?;
            Err(ClassificationError::StationNotFound(2))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM stations", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO patients (id, first_name, last_name, station_id) VALUES (1, 'A', 'B', 99)",
                [],
            )?;
            Ok(())
        });
        assert!(matches!(result, Err(ClassificationError::Database(_))));
    }
}
