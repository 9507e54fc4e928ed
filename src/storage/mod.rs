/// Storage layer for persisting sleep data
///
/// This module handles all database operations using SQLite. It supplies,
/// per child, the ordered collection of sleep periods and accepts new
/// periods and the open-to-closed mutation. The domain layer never sees
/// the storage medium.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{ChildId, ChildSleepLog, SleepPeriod};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("child not found: {child}")]
    ChildNotFound { child: String },

    #[error("sleep period not found: {period_id}")]
    PeriodNotFound { period_id: String },

    #[error("child already exists: {name}")]
    DuplicateChild { name: String },

    #[error("invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("migration error: {0}")]
    Migration(String),
}

/// Identity row for a child, as stored
///
/// The period collection is loaded separately; this is just the key,
/// label and birth date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildProfile {
    pub id: ChildId,
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Trait defining the storage interface for sleep tracking
///
/// This keeps the tool layer independent of SQLite; a different store can
/// be swapped in behind the same interface.
pub trait SleepStorage {
    /// Register a new child
    fn create_child(&self, child: &ChildProfile) -> Result<(), StorageError>;

    /// Look up a child by name
    fn find_child(&self, name: &str) -> Result<ChildProfile, StorageError>;

    /// List all registered children
    fn list_children(&self) -> Result<Vec<ChildProfile>, StorageError>;

    /// Append a new period (open or closed) to a child's log
    fn insert_period(&self, child_id: ChildId, period: &SleepPeriod) -> Result<(), StorageError>;

    /// Persist a period mutation (close, comment append)
    fn update_period(&self, period: &SleepPeriod) -> Result<(), StorageError>;

    /// All periods for a child, in insertion order
    fn periods_for_child(&self, child_id: ChildId) -> Result<Vec<SleepPeriod>, StorageError>;

    /// Rebuild a child's full sleep log from stored rows
    fn load_log(&self, child: &ChildProfile) -> Result<ChildSleepLog, StorageError> {
        let periods = self.periods_for_child(child.id)?;
        ChildSleepLog::from_records(child.name.clone(), child.birth_date, periods)
            .map_err(|e| StorageError::InvalidRecord(e.to_string()))
    }
}
