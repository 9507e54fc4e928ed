/// Basic unit tests to verify core functionality
use sleep_tracker_mcp::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_sleep_period_creation() {
        let period = SleepPeriod::new(
            dt(2024, 3, 15, 20, 30),
            Some(dt(2024, 3, 16, 6, 0)),
            "slept through the night",
        );

        assert!(period.is_ok());
        let period = period.unwrap();
        assert!(!period.is_open());
        assert_eq!(period.duration(), (9, 30));
        assert!(!period.is_daytime_nap());
    }

    #[test]
    fn test_child_log_creation() {
        let log = ChildSleepLog::new("Alice", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert!(log.is_ok());
        let log = log.unwrap();
        assert_eq!(log.name(), "Alice");
        assert!(log.periods().is_empty());
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut log =
            ChildSleepLog::new("Alice", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()).unwrap();

        // Ending with nothing open is a state error
        assert!(log.end_sleep(dt(2024, 3, 15, 6, 0), None).is_err());

        log.start_sleep(dt(2024, 3, 15, 20, 0), "").unwrap();
        // Starting again while open is a state error
        assert!(log.start_sleep(dt(2024, 3, 15, 21, 0), "").is_err());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = SleepTrackerServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_analytics_engine_creation() {
        let analytics = SleepAnalytics::new();
        let log =
            ChildSleepLog::new("Alice", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()).unwrap();
        let summary =
            analytics.day_summary(&log, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(summary.sleep_minutes, 0);
        assert_eq!(summary.awake_minutes, 24 * 60);
    }
}
