/// Tool for checking the current sleep state
///
/// This module implements the sleep_status MCP tool: the running duration
/// of the open sleep, or the time elapsed since the last sleep ended.

use serde::{Deserialize, Serialize};
use chrono::Local;

use crate::storage::SleepStorage;
use crate::tools::ToolError;

/// Parameters for checking a child's sleep status
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub child: String,
}

/// Response from checking sleep status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub child: String,
    pub asleep: bool,
    /// Running duration of the open sleep, whole minutes
    pub sleeping_minutes: Option<i64>,
    /// Minutes since the last sleep ended
    pub awake_minutes: Option<i64>,
    pub message: String,
}

/// Report the current sleep state for a child
pub fn sleep_status<S: SleepStorage>(
    storage: &S,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let profile = storage.find_child(params.child.trim())?;
    let log = storage.load_log(&profile)?;
    let now = Local::now().naive_local();

    if let Some(period) = log.active_period() {
        let (hours, minutes) = period.duration_at(now);
        return Ok(StatusResponse {
            child: profile.name.clone(),
            asleep: true,
            sleeping_minutes: Some(hours * 60 + minutes),
            awake_minutes: None,
            message: format!(
                "😴 {} is asleep since {} ({}h {:02}m so far)",
                profile.name,
                period.start_time().format("%H:%M"),
                hours,
                minutes
            ),
        });
    }

    match log.time_since_last_sleep(now) {
        Some((hours, minutes)) => Ok(StatusResponse {
            child: profile.name.clone(),
            asleep: false,
            sleeping_minutes: None,
            awake_minutes: Some(hours * 60 + minutes),
            message: format!(
                "☀️ {} has been awake for {}h {:02}m",
                profile.name, hours, minutes
            ),
        }),
        None => Ok(StatusResponse {
            child: profile.name.clone(),
            asleep: false,
            sleeping_minutes: None,
            awake_minutes: None,
            message: format!("No sleep recorded for {} yet.", profile.name),
        }),
    }
}
