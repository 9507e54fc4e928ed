/// ChildSleepLog aggregate owning a child's sleep periods
///
/// The log enforces the single-open-period invariant (at most one sleep in
/// progress) and implements the day-boundary aggregation that attributes
/// the minutes of a midnight-crossing sleep to the day it ended on.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{LogError, SleepPeriod, StateError, ValidationError};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Aggregate sleep/awake totals for one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats<'a> {
    /// Minutes of sleep credited to the target day
    pub total_sleep_minutes: i64,
    /// 1440 minus the sleep minutes. Deliberately not clamped: overlapping
    /// records for one day can drive this negative.
    pub total_awake_minutes: i64,
    /// The periods that qualified, in storage order
    pub periods: Vec<&'a SleepPeriod>,
}

/// A child's sleep history.
///
/// Periods are append-only and kept in insertion order; there is no
/// deletion or reordering. The current open period is tracked by a cached
/// index maintained by `start_sleep`/`end_sleep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSleepLog {
    name: String,
    birth_date: NaiveDate,
    periods: Vec<SleepPeriod>,
    open_index: Option<usize>,
}

impl ChildSleepLog {
    /// Create an empty log for a child.
    ///
    /// Fails if the birth date is after the current date.
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Result<Self, ValidationError> {
        let today = Local::now().date_naive();
        if birth_date > today {
            return Err(ValidationError::BirthDateInFuture { birth_date });
        }

        Ok(Self {
            name: name.into(),
            birth_date,
            periods: Vec::new(),
            open_index: None,
        })
    }

    /// Rebuild a log from externally supplied records (storage loads).
    ///
    /// The open-period cache is seeded with a reverse scan so that if the
    /// supplied data ever violates the invariant, the most recently
    /// appended open period wins.
    pub fn from_records(
        name: impl Into<String>,
        birth_date: NaiveDate,
        periods: Vec<SleepPeriod>,
    ) -> Result<Self, ValidationError> {
        let today = Local::now().date_naive();
        if birth_date > today {
            return Err(ValidationError::BirthDateInFuture { birth_date });
        }

        let open_index = periods.iter().rposition(SleepPeriod::is_open);
        Ok(Self {
            name: name.into(),
            birth_date,
            periods,
            open_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// All periods in insertion order
    pub fn periods(&self) -> &[SleepPeriod] {
        &self.periods
    }

    /// Age in whole months as of today
    pub fn age_months(&self) -> i32 {
        self.age_months_at(Local::now().date_naive())
    }

    /// Age in whole months as of an explicit date. The final partial month
    /// does not count until the day-of-month is reached.
    pub fn age_months_at(&self, today: NaiveDate) -> i32 {
        (today.year() - self.birth_date.year()) * 12
            + (today.month() as i32 - self.birth_date.month() as i32)
            - (today.day() < self.birth_date.day()) as i32
    }

    /// The sleep currently in progress, if any
    pub fn active_period(&self) -> Option<&SleepPeriod> {
        self.open_index.and_then(|i| self.periods.get(i))
    }

    /// Begin a new sleep period.
    ///
    /// Fails without mutating anything if a period is already open.
    pub fn start_sleep(
        &mut self,
        start_time: NaiveDateTime,
        comment: impl Into<String>,
    ) -> Result<&SleepPeriod, StateError> {
        if self.active_period().is_some() {
            return Err(StateError::SleepAlreadyOpen);
        }

        self.periods.push(SleepPeriod::open(start_time, comment));
        let index = self.periods.len() - 1;
        self.open_index = Some(index);
        Ok(&self.periods[index])
    }

    /// Close the open sleep period.
    ///
    /// Fails with a state error if nothing is open, and propagates the
    /// close validation unchanged if `end_time` precedes the start; in
    /// both cases the log is left untouched. A non-empty comment is
    /// appended to the period's existing comment, newline-separated.
    pub fn end_sleep(
        &mut self,
        end_time: NaiveDateTime,
        comment: Option<&str>,
    ) -> Result<&SleepPeriod, LogError> {
        let index = self.open_index.ok_or(StateError::NoOpenSleep)?;
        let period = self
            .periods
            .get_mut(index)
            .ok_or(StateError::NoOpenSleep)?;

        period.close(end_time)?;
        if let Some(extra) = comment {
            if !extra.is_empty() {
                period.append_comment(extra);
            }
        }

        self.open_index = None;
        Ok(&self.periods[index])
    }

    /// Record a sleep that was not tracked live, already closed.
    ///
    /// Does not touch the open period, if any; the new record is appended
    /// at the end of the collection regardless of its start time.
    pub fn log_missed_sleep(
        &mut self,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        comment: impl Into<String>,
    ) -> Result<&SleepPeriod, ValidationError> {
        let period = SleepPeriod::new(start_time, Some(end_time), comment)?;
        self.periods.push(period);
        Ok(&self.periods[self.periods.len() - 1])
    }

    /// Hours and minutes since the most recent period ended.
    ///
    /// None if there are no periods yet or the latest one is still open.
    pub fn time_since_last_sleep(&self, now: NaiveDateTime) -> Option<(i64, i64)> {
        let end = self.periods.last()?.end_time()?;
        let total_minutes = (now - end).num_minutes();
        Some((total_minutes / 60, total_minutes % 60))
    }

    /// Sleep/awake totals for today
    pub fn daily_stats_today(&self) -> DailyStats<'_> {
        self.daily_stats(Local::now().date_naive())
    }

    /// Sleep/awake totals for one calendar day.
    ///
    /// Only closed periods participate. A period qualifies either as the
    /// tail of a night that ended on the target day (started earlier,
    /// ended on it - credited from midnight) or as a same-day period
    /// (started and ended on it - credited in full). A period that starts
    /// on the target day but ends later belongs to the later day.
    pub fn daily_stats(&self, target_date: NaiveDate) -> DailyStats<'_> {
        let mut qualifying = Vec::new();
        let mut total_sleep_minutes = 0i64;

        for period in &self.periods {
            if let Some(minutes) = credited_minutes(period, target_date) {
                total_sleep_minutes += minutes;
                qualifying.push(period);
            }
        }

        DailyStats {
            total_sleep_minutes,
            total_awake_minutes: MINUTES_PER_DAY - total_sleep_minutes,
            periods: qualifying,
        }
    }
}

/// Minutes of a period credited to `target_date`, or None if it does not
/// qualify for that day.
///
/// A night-crossing period (started earlier, ended on the target day) is
/// credited from midnight of the target day to its end; a same-day period
/// is credited in full. Open periods and periods ending on any other day
/// never qualify.
pub fn credited_minutes(period: &SleepPeriod, target_date: NaiveDate) -> Option<i64> {
    let end = period.end_time()?;
    let start = period.start_time();

    let effective_start = if start.date() < target_date && end.date() == target_date {
        target_date.and_time(NaiveTime::MIN)
    } else if start.date() == target_date && end.date() == target_date {
        start
    } else {
        return None;
    };

    Some((end - effective_start).num_minutes())
}
