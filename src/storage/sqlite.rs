/// SQLite implementation of the sleep storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving children and their sleep periods. Timestamps are stored
/// as naive local time strings; no timezone conversion happens anywhere.

use std::path::PathBuf;
use rusqlite::{params, Connection};
use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{ChildId, PeriodId, SleepPeriod};
use crate::storage::{migrations, ChildProfile, SleepStorage, StorageError};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-based storage implementation
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::prepare(conn, Some(&db_path))
    }

    /// In-memory storage, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::prepare(conn, None)
    }

    fn prepare(conn: Connection, db_path: Option<&PathBuf>) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        match db_path {
            Some(path) => tracing::info!("SQLite storage initialized at: {:?}", path),
            None => tracing::debug!("SQLite storage initialized in memory"),
        }

        Ok(Self { conn })
    }

    fn datetime_to_string(value: NaiveDateTime) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }

    fn string_to_datetime(s: &str, column: usize) -> Result<NaiveDateTime, rusqlite::Error> {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                column,
                "Invalid datetime".to_string(),
                rusqlite::types::Type::Text,
            )
        })
    }

    fn row_to_period(row: &rusqlite::Row<'_>) -> Result<SleepPeriod, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = PeriodId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                0,
                "Invalid UUID".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        let start_str: String = row.get(1)?;
        let start_time = Self::string_to_datetime(&start_str, 1)?;

        let end_str: Option<String> = row.get(2)?;
        let end_time = match end_str {
            Some(s) => Some(Self::string_to_datetime(&s, 2)?),
            None => None,
        };

        Ok(SleepPeriod::from_existing(id, start_time, end_time, row.get(3)?))
    }

    fn row_to_child(row: &rusqlite::Row<'_>) -> Result<ChildProfile, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = ChildId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                0,
                "Invalid UUID".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        let birth_str: String = row.get(2)?;
        let birth_date = NaiveDate::parse_from_str(&birth_str, DATE_FORMAT).map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                2,
                "Invalid date".to_string(),
                rusqlite::types::Type::Text,
            )
        })?;

        Ok(ChildProfile {
            id,
            name: row.get(1)?,
            birth_date,
        })
    }

    fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl SleepStorage for SqliteStorage {
    /// Register a new child
    fn create_child(&self, child: &ChildProfile) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO children (id, name, birth_date) VALUES (?1, ?2, ?3)",
            params![
                child.id.to_string(),
                child.name,
                child.birth_date.format(DATE_FORMAT).to_string()
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created child: {} ({})", child.name, child.id);
                Ok(())
            }
            Err(e) if Self::is_unique_violation(&e) => Err(StorageError::DuplicateChild {
                name: child.name.clone(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Look up a child by name
    fn find_child(&self, name: &str) -> Result<ChildProfile, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, birth_date FROM children WHERE name = ?1")?;

        let result = stmt.query_row(params![name], Self::row_to_child);

        match result {
            Ok(child) => Ok(child),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::ChildNotFound {
                child: name.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List all registered children
    fn list_children(&self) -> Result<Vec<ChildProfile>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, birth_date FROM children ORDER BY name")?;

        let child_iter = stmt.query_map([], Self::row_to_child)?;

        let mut children = Vec::new();
        for child in child_iter {
            children.push(child?);
        }

        Ok(children)
    }

    /// Append a new period (open or closed) to a child's log
    fn insert_period(&self, child_id: ChildId, period: &SleepPeriod) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO sleep_periods (id, child_id, start_time, end_time, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                period.id().to_string(),
                child_id.to_string(),
                Self::datetime_to_string(period.start_time()),
                period.end_time().map(Self::datetime_to_string),
                period.comment()
            ],
        )?;

        tracing::debug!("Inserted sleep period {} for child {}", period.id(), child_id);
        Ok(())
    }

    /// Persist a period mutation (close, comment append)
    fn update_period(&self, period: &SleepPeriod) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE sleep_periods SET end_time = ?2, comment = ?3 WHERE id = ?1",
            params![
                period.id().to_string(),
                period.end_time().map(Self::datetime_to_string),
                period.comment()
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::PeriodNotFound {
                period_id: period.id().to_string(),
            });
        }

        tracing::debug!("Updated sleep period {}", period.id());
        Ok(())
    }

    /// All periods for a child, in insertion order (rowid, not start_time)
    fn periods_for_child(&self, child_id: ChildId) -> Result<Vec<SleepPeriod>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, start_time, end_time, comment FROM sleep_periods
             WHERE child_id = ?1 ORDER BY rowid ASC",
        )?;

        let period_iter = stmt.query_map(params![child_id.to_string()], Self::row_to_period)?;

        let mut periods = Vec::new();
        for period in period_iter {
            periods.push(period?);
        }

        Ok(periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn sample_child() -> ChildProfile {
        ChildProfile {
            id: ChildId::new(),
            name: "Alice".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_child_round_trip() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let child = sample_child();

        storage.create_child(&child).unwrap();
        let loaded = storage.find_child("Alice").unwrap();
        assert_eq!(loaded, child);

        assert!(matches!(
            storage.find_child("Bob"),
            Err(StorageError::ChildNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_child_name_rejected() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let child = sample_child();
        storage.create_child(&child).unwrap();

        let mut twin = sample_child();
        twin.id = ChildId::new();
        assert!(matches!(
            storage.create_child(&twin),
            Err(StorageError::DuplicateChild { .. })
        ));
    }

    #[test]
    fn test_periods_round_trip_in_insertion_order() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let child = sample_child();
        storage.create_child(&child).unwrap();

        // Inserted out of temporal order on purpose
        let late = SleepPeriod::new(dt(2024, 3, 15, 20, 0), Some(dt(2024, 3, 16, 6, 0)), "night")
            .unwrap();
        let early = SleepPeriod::new(dt(2024, 3, 15, 13, 0), Some(dt(2024, 3, 15, 15, 0)), "nap")
            .unwrap();
        storage.insert_period(child.id, &late).unwrap();
        storage.insert_period(child.id, &early).unwrap();

        let periods = storage.periods_for_child(child.id).unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0], late);
        assert_eq!(periods[1], early);
    }

    #[test]
    fn test_open_period_closes_via_update() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let child = sample_child();
        storage.create_child(&child).unwrap();

        let mut period = SleepPeriod::open(dt(2024, 3, 15, 20, 0), "");
        storage.insert_period(child.id, &period).unwrap();

        let loaded = &storage.periods_for_child(child.id).unwrap()[0];
        assert!(loaded.is_open());

        period.close(dt(2024, 3, 16, 6, 0)).unwrap();
        period.append_comment("slept through");
        storage.update_period(&period).unwrap();

        let loaded = &storage.periods_for_child(child.id).unwrap()[0];
        assert_eq!(loaded.end_time(), Some(dt(2024, 3, 16, 6, 0)));
        assert!(loaded.comment().contains("slept through"));
    }

    #[test]
    fn test_update_missing_period_fails() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let period = SleepPeriod::open(dt(2024, 3, 15, 20, 0), "");
        assert!(matches!(
            storage.update_period(&period),
            Err(StorageError::PeriodNotFound { .. })
        ));
    }

    #[test]
    fn test_load_log_restores_active_period() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let child = sample_child();
        storage.create_child(&child).unwrap();

        let closed = SleepPeriod::new(dt(2024, 3, 14, 20, 0), Some(dt(2024, 3, 15, 6, 0)), "")
            .unwrap();
        let open = SleepPeriod::open(dt(2024, 3, 15, 13, 0), "");
        storage.insert_period(child.id, &closed).unwrap();
        storage.insert_period(child.id, &open).unwrap();

        let log = storage.load_log(&child).unwrap();
        assert_eq!(log.periods().len(), 2);
        assert_eq!(
            log.active_period().unwrap().start_time(),
            dt(2024, 3, 15, 13, 0)
        );
    }
}
