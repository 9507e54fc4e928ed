/// Domain module containing the core sleep tracking model
///
/// This module defines the core entities (SleepPeriod, ChildSleepLog) and
/// their validation rules. The lifecycle invariant (at most one open sleep
/// period per child) and the day-boundary aggregation live here.

pub mod child;
pub mod period;
pub mod types;

// Re-export public types for easy access
pub use child::*;
pub use period::*;
pub use types::*;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Malformed input. Not retryable with the same input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("end time {end} cannot be earlier than start time {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("birth date {birth_date} cannot be in the future")]
    BirthDateInFuture { birth_date: NaiveDate },
}

/// Precondition violation against the log's current lifecycle state.
/// The caller should re-query `active_period()` before retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("a sleep period is already open; end it before starting a new one")]
    SleepAlreadyOpen,

    #[error("no open sleep period")]
    NoOpenSleep,
}

/// Either failure mode of a log operation that both checks lifecycle state
/// and validates its input (`end_sleep`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}
