/// Analytics engine for multi-day sleep summaries
///
/// This module builds on the core daily aggregation to produce per-day
/// breakdowns (night sleep vs. naps) and range averages for reporting.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{credited_minutes, ChildSleepLog};

/// One day's sleep, split into night sleep and daytime naps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sleep_minutes: i64,
    pub awake_minutes: i64,
    /// Minutes credited to periods classified as night sleep
    pub night_minutes: i64,
    /// Minutes credited to periods classified as daytime naps
    pub nap_minutes: i64,
    pub nap_count: usize,
}

/// Summary over an inclusive date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    pub days: Vec<DaySummary>,
    /// Whole-minute average sleep per day over the range
    pub avg_sleep_minutes: i64,
}

/// Analytics engine for processing sleep data
pub struct SleepAnalytics;

impl SleepAnalytics {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Break one day down into night sleep and nap components.
    ///
    /// The totals agree with `ChildSleepLog::daily_stats` for the same
    /// date; the split uses the start-hour classification of each
    /// qualifying period.
    pub fn day_summary(&self, log: &ChildSleepLog, date: NaiveDate) -> DaySummary {
        let stats = log.daily_stats(date);

        let mut night_minutes = 0;
        let mut nap_minutes = 0;
        let mut nap_count = 0;

        for period in &stats.periods {
            let minutes = credited_minutes(period, date).unwrap_or(0);
            if period.is_daytime_nap() {
                nap_minutes += minutes;
                nap_count += 1;
            } else {
                night_minutes += minutes;
            }
        }

        DaySummary {
            date,
            sleep_minutes: stats.total_sleep_minutes,
            awake_minutes: stats.total_awake_minutes,
            night_minutes,
            nap_minutes,
            nap_count,
        }
    }

    /// Summarize every day in the inclusive range `from..=to`.
    ///
    /// An empty or inverted range yields no days and a zero average.
    pub fn range_summary(&self, log: &ChildSleepLog, from: NaiveDate, to: NaiveDate) -> RangeSummary {
        let mut days = Vec::new();
        let mut date = from;
        while date <= to {
            days.push(self.day_summary(log, date));
            date = date + Duration::days(1);
        }

        let avg_sleep_minutes = if days.is_empty() {
            0
        } else {
            days.iter().map(|d| d.sleep_minutes).sum::<i64>() / days.len() as i64
        };

        RangeSummary {
            days,
            avg_sleep_minutes,
        }
    }
}

impl Default for SleepAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn scenario_log() -> ChildSleepLog {
        let mut log =
            ChildSleepLog::new("Alice", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()).unwrap();
        log.start_sleep(dt(2024, 3, 14, 20, 0), "").unwrap();
        log.end_sleep(dt(2024, 3, 15, 6, 0), None).unwrap();
        log.start_sleep(dt(2024, 3, 15, 13, 0), "").unwrap();
        log.end_sleep(dt(2024, 3, 15, 15, 0), None).unwrap();
        log
    }

    #[test]
    fn test_day_summary_splits_night_and_naps() {
        let log = scenario_log();
        let analytics = SleepAnalytics::new();
        let summary = analytics.day_summary(&log, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        assert_eq!(summary.sleep_minutes, 480);
        assert_eq!(summary.night_minutes, 360);
        assert_eq!(summary.nap_minutes, 120);
        assert_eq!(summary.nap_count, 1);
        assert_eq!(summary.awake_minutes, 960);
    }

    #[test]
    fn test_range_summary_average() {
        let log = scenario_log();
        let analytics = SleepAnalytics::new();
        let summary = analytics.range_summary(
            &log,
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );

        // Day 1 credits nothing (its night sleep ended on day 2)
        assert_eq!(summary.days.len(), 2);
        assert_eq!(summary.days[0].sleep_minutes, 0);
        assert_eq!(summary.days[1].sleep_minutes, 480);
        assert_eq!(summary.avg_sleep_minutes, 240);
    }

    #[test]
    fn test_range_summary_empty_range() {
        let log = scenario_log();
        let analytics = SleepAnalytics::new();
        let summary = analytics.range_summary(
            &log,
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );
        assert!(summary.days.is_empty());
        assert_eq!(summary.avg_sleep_minutes, 0);
    }
}
