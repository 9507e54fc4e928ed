/// Tool for recording the sleep lifecycle
///
/// This module implements the sleep_log MCP tool: starting a sleep,
/// ending the open one, and entering a missed (already finished) sleep.

use serde::{Deserialize, Serialize};
use chrono::Local;

use crate::storage::SleepStorage;
use crate::tools::{parse_datetime, ToolError};

/// Parameters for the sleep_log tool
#[derive(Debug, Deserialize)]
pub struct SleepLogParams {
    pub child: String,
    /// "start", "end" or "missed"
    pub action: String,
    /// Event time for start/end; defaults to now
    pub time: Option<String>,
    /// Start of a missed sleep (required for "missed")
    pub start_time: Option<String>,
    /// End of a missed sleep (required for "missed")
    pub end_time: Option<String>,
    pub comment: Option<String>,
}

/// Response from the sleep_log tool
#[derive(Debug, Serialize)]
pub struct SleepLogResponse {
    pub success: bool,
    pub message: String,
}

/// Record a sleep lifecycle event for a child
pub fn log_sleep<S: SleepStorage>(
    storage: &S,
    params: SleepLogParams,
) -> Result<SleepLogResponse, ToolError> {
    let profile = storage.find_child(params.child.trim())?;
    let mut log = storage.load_log(&profile)?;

    let message = match params.action.trim() {
        "start" => {
            let start_time = match &params.time {
                Some(s) => parse_datetime(s)?,
                None => Local::now().naive_local(),
            };
            let comment = params.comment.unwrap_or_default();

            let period = log.start_sleep(start_time, comment)?;
            storage.insert_period(profile.id, period)?;

            format!(
                "😴 Sleep started for {} at {}",
                profile.name,
                start_time.format("%Y-%m-%d %H:%M")
            )
        }
        "end" => {
            let end_time = match &params.time {
                Some(s) => parse_datetime(s)?,
                None => Local::now().naive_local(),
            };

            let period = log.end_sleep(end_time, params.comment.as_deref())?;
            storage.update_period(period)?;

            format!(
                "☀️ Sleep ended for {} at {} ({})",
                profile.name,
                end_time.format("%Y-%m-%d %H:%M"),
                period.format_duration_at(end_time)
            )
        }
        "missed" => {
            let start_time = params
                .start_time
                .as_deref()
                .ok_or_else(|| ToolError::InvalidParams("missed sleep needs start_time".into()))
                .and_then(parse_datetime)?;
            let end_time = params
                .end_time
                .as_deref()
                .ok_or_else(|| ToolError::InvalidParams("missed sleep needs end_time".into()))
                .and_then(parse_datetime)?;

            let period =
                log.log_missed_sleep(start_time, end_time, params.comment.unwrap_or_default())?;
            storage.insert_period(profile.id, period)?;

            format!(
                "📝 Recorded missed sleep for {}: {} - {} ({})",
                profile.name,
                start_time.format("%Y-%m-%d %H:%M"),
                end_time.format("%Y-%m-%d %H:%M"),
                period.format_duration_at(end_time)
            )
        }
        other => {
            return Err(ToolError::InvalidParams(format!(
                "unknown action '{}', expected start, end or missed",
                other
            )));
        }
    };

    Ok(SleepLogResponse {
        success: true,
        message,
    })
}
