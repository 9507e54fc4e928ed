/// Integration tests covering the tool layer end to end
use sleep_tracker_mcp::tools::*;
use sleep_tracker_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn storage() -> SqliteStorage {
        SqliteStorage::open_in_memory().expect("Failed to create storage")
    }

    fn register_alice(storage: &SqliteStorage) {
        let response = create_child(
            storage,
            CreateChildParams {
                name: "Alice".to_string(),
                birth_date: "2023-01-01".to_string(),
            },
        )
        .expect("Failed to create child");
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = SleepTrackerServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");

        let _storage = server.storage();
        let _analytics = server.analytics();
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        {
            let server = SleepTrackerServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");
            register_alice(server.storage());
        }

        // A second server over the same file sees the registered child
        let server2 = SleepTrackerServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let children = server2.storage().list_children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "Alice");
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        // Storage implements the SleepStorage trait object-safely
        let _: &dyn SleepStorage = &storage;
    }

    #[test]
    fn test_full_sleep_cycle_through_tools() {
        let storage = storage();
        register_alice(&storage);

        let response = log_sleep(
            &storage,
            SleepLogParams {
                child: "Alice".to_string(),
                action: "start".to_string(),
                time: Some("2024-03-14 20:00".to_string()),
                start_time: None,
                end_time: None,
                comment: Some("bedtime".to_string()),
            },
        )
        .expect("Failed to start sleep");
        assert!(response.success);

        // Starting again while a sleep is open must fail
        let again = log_sleep(
            &storage,
            SleepLogParams {
                child: "Alice".to_string(),
                action: "start".to_string(),
                time: Some("2024-03-14 21:00".to_string()),
                start_time: None,
                end_time: None,
                comment: None,
            },
        );
        assert!(again.is_err());

        let response = log_sleep(
            &storage,
            SleepLogParams {
                child: "Alice".to_string(),
                action: "end".to_string(),
                time: Some("2024-03-15 06:00".to_string()),
                start_time: None,
                end_time: None,
                comment: Some("woke up happy".to_string()),
            },
        )
        .expect("Failed to end sleep");
        assert!(response.message.contains("10:00"));

        // A nap the same day
        log_sleep(
            &storage,
            SleepLogParams {
                child: "Alice".to_string(),
                action: "missed".to_string(),
                time: None,
                start_time: Some("2024-03-15 13:00".to_string()),
                end_time: Some("2024-03-15 15:00".to_string()),
                comment: None,
            },
        )
        .expect("Failed to record missed sleep");

        let stats = sleep_stats(
            &storage,
            StatsParams {
                child: "Alice".to_string(),
                date: Some("2024-03-15".to_string()),
            },
        )
        .expect("Failed to compute stats");

        // 6h night tail (midnight to 06:00) + 2h nap
        assert_eq!(stats.total_sleep_minutes, 480);
        assert_eq!(stats.total_awake_minutes, 960);
        assert_eq!(stats.periods.len(), 2);
    }

    #[test]
    fn test_export_contains_closed_periods() {
        let storage = storage();
        register_alice(&storage);

        log_sleep(
            &storage,
            SleepLogParams {
                child: "Alice".to_string(),
                action: "missed".to_string(),
                time: None,
                start_time: Some("2024-03-15 13:00".to_string()),
                end_time: Some("2024-03-15 15:00".to_string()),
                comment: Some("stroller nap".to_string()),
            },
        )
        .unwrap();

        let export = export_sleep(
            &storage,
            ExportParams {
                child: "Alice".to_string(),
            },
        )
        .unwrap();

        assert_eq!(export.rows, 1);
        assert!(export.csv.starts_with("start_time,end_time,duration,comment"));
        assert!(export.csv.contains("2024-03-15 13:00,2024-03-15 15:00,02:00,stroller nap"));
    }

    #[test]
    fn test_unknown_child_is_reported() {
        let storage = storage();
        let result = sleep_status(
            &storage,
            StatusParams {
                child: "Nobody".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(ToolError::Storage(StorageError::ChildNotFound { .. }))
        ));
    }

    #[test]
    fn test_future_birth_date_rejected_by_tool() {
        let storage = storage();
        let next_year = chrono::Local::now().date_naive() + chrono::Duration::days(365);
        let result = create_child(
            &storage,
            CreateChildParams {
                name: "Future".to_string(),
                birth_date: next_year.format("%Y-%m-%d").to_string(),
            },
        );
        assert!(matches!(result, Err(ToolError::Validation(_))));
        // Nothing was stored
        assert!(storage.list_children().unwrap().is_empty());
    }
}
