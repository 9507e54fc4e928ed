/// SleepPeriod entity representing one contiguous interval of sleep
///
/// A period is open while the child is still asleep (no end time) and
/// closed once an end time is recorded. Validation guarantees a closed
/// period never ends before it starts.

use serde::{Deserialize, Serialize};
use chrono::{Local, NaiveDateTime, Timelike};
use crate::domain::{PeriodId, ValidationError};

/// One sleep interval, open or closed.
///
/// `start_time` is immutable after creation. `end_time` changes only
/// through [`SleepPeriod::close`], and `comment` only through
/// [`SleepPeriod::append_comment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepPeriod {
    /// Unique identifier for this period
    id: PeriodId,
    /// When the sleep started (naive local time)
    start_time: NaiveDateTime,
    /// When the sleep ended; None while the child is still asleep
    end_time: Option<NaiveDateTime>,
    /// Free-text note attached to this period
    comment: String,
}

impl SleepPeriod {
    /// Create a new period with validation
    ///
    /// With `end_time` absent the period is open and creation cannot fail;
    /// with `end_time` present it must not be earlier than `start_time`.
    pub fn new(
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        comment: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(end) = end_time {
            if end < start_time {
                return Err(ValidationError::EndBeforeStart {
                    start: start_time,
                    end,
                });
            }
        }

        Ok(Self {
            id: PeriodId::new(),
            start_time,
            end_time,
            comment: comment.into(),
        })
    }

    /// Create an open period. Infallible: there is nothing to validate yet.
    pub fn open(start_time: NaiveDateTime, comment: impl Into<String>) -> Self {
        Self {
            id: PeriodId::new(),
            start_time,
            end_time: None,
            comment: comment.into(),
        }
    }

    /// Rebuild a period from already-validated data (storage loads)
    pub fn from_existing(
        id: PeriodId,
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        comment: String,
    ) -> Self {
        Self {
            id,
            start_time,
            end_time,
            comment,
        }
    }

    pub fn id(&self) -> PeriodId {
        self.id
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Record the end of this period.
    ///
    /// Fails if `end_time` is earlier than the start, leaving the period
    /// untouched. There is no "already closed" guard: re-closing with a
    /// later or earlier (but still valid) end time is part of the contract.
    pub fn close(&mut self, end_time: NaiveDateTime) -> Result<(), ValidationError> {
        if end_time < self.start_time {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_time,
                end: end_time,
            });
        }
        self.end_time = Some(end_time);
        Ok(())
    }

    /// Append a note, newline-separated, to the existing comment
    pub fn append_comment(&mut self, extra: &str) {
        self.comment.push('\n');
        self.comment.push_str(extra);
    }

    /// True while the child is still asleep
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Daytime nap vs. night sleep, decided by the start hour alone.
    ///
    /// Start hours in [8, 20) count as daytime; the upper bound is
    /// exclusive, so a sleep starting at 20:00 is night sleep while
    /// 19:59 is still a nap. Duration and end time play no part.
    pub fn is_daytime_nap(&self) -> bool {
        (8..20).contains(&self.start_time.hour())
    }

    /// Length of this period as (hours, minutes).
    ///
    /// For an open period the duration runs against the wall clock and
    /// keeps growing; it is never persisted as a fixed quantity.
    pub fn duration(&self) -> (i64, i64) {
        self.duration_at(Local::now().naive_local())
    }

    /// Length of this period as (hours, minutes) against an explicit
    /// instant, used for the open case. Whole minutes, floored.
    pub fn duration_at(&self, now: NaiveDateTime) -> (i64, i64) {
        let end = self.end_time.unwrap_or(now);
        let total_minutes = (end - self.start_time).num_minutes();
        (total_minutes / 60, total_minutes % 60)
    }

    /// Duration rendered as "hh:mm"
    pub fn format_duration_at(&self, now: NaiveDateTime) -> String {
        let (hours, minutes) = self.duration_at(now);
        format!("{:02}:{:02}", hours, minutes)
    }
}
