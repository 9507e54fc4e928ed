/// Tool for daily sleep statistics
///
/// This module implements the sleep_stats MCP tool: exact sleep/awake
/// minute totals for one calendar day, with the qualifying periods split
/// into night sleep and daytime naps.

use serde::{Deserialize, Serialize};
use chrono::Local;

use crate::analytics::SleepAnalytics;
use crate::storage::SleepStorage;
use crate::tools::{format_minutes, parse_date, ToolError};

/// Parameters for the sleep_stats tool
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub child: String,
    /// Target day as YYYY-MM-DD; defaults to today
    pub date: Option<String>,
}

/// One qualifying period in the day's statistics
#[derive(Debug, Serialize)]
pub struct PeriodSummary {
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub kind: String,
    pub comment: String,
}

/// Response from the sleep_stats tool
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub date: String,
    pub total_sleep_minutes: i64,
    pub total_awake_minutes: i64,
    pub periods: Vec<PeriodSummary>,
    pub message: String,
}

/// Compute daily statistics for a child
pub fn sleep_stats<S: SleepStorage>(
    storage: &S,
    params: StatsParams,
) -> Result<StatsResponse, ToolError> {
    let profile = storage.find_child(params.child.trim())?;
    let log = storage.load_log(&profile)?;

    let target_date = match &params.date {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };

    let stats = log.daily_stats(target_date);
    let summary = SleepAnalytics::new().day_summary(&log, target_date);

    let periods: Vec<PeriodSummary> = stats
        .periods
        .iter()
        .map(|p| PeriodSummary {
            start_time: p.start_time().format("%Y-%m-%d %H:%M").to_string(),
            // Qualifying periods are always closed
            end_time: p
                .end_time()
                .map(|e| e.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            duration: p.format_duration_at(p.start_time()),
            kind: if p.is_daytime_nap() { "nap" } else { "night" }.to_string(),
            comment: p.comment().to_string(),
        })
        .collect();

    let mut lines = vec![format!(
        "📊 Sleep on {}: {} asleep, {} awake",
        target_date,
        format_minutes(stats.total_sleep_minutes),
        format_minutes(stats.total_awake_minutes)
    )];
    lines.push(format!(
        "🌙 Night sleep: {} | ☀️ Naps: {} ({} nap{})",
        format_minutes(summary.night_minutes),
        format_minutes(summary.nap_minutes),
        summary.nap_count,
        if summary.nap_count == 1 { "" } else { "s" }
    ));
    for p in &periods {
        lines.push(format!(
            "  {} {} - {} ({})",
            if p.kind == "nap" { "☀️" } else { "🌙" },
            p.start_time,
            p.end_time,
            p.duration
        ));
    }

    Ok(StatsResponse {
        date: target_date.to_string(),
        total_sleep_minutes: stats.total_sleep_minutes,
        total_awake_minutes: stats.total_awake_minutes,
        periods,
        message: lines.join("\n"),
    })
}
