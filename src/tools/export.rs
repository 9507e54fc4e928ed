/// Tool for exporting a child's sleep history
///
/// This module implements the sleep_export MCP tool: the full ordered
/// collection of closed periods rendered as CSV rows, ready for a
/// spreadsheet or chart on the client side.

use serde::{Deserialize, Serialize};

use crate::storage::SleepStorage;
use crate::tools::ToolError;

/// Parameters for the sleep_export tool
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub child: String,
}

/// Response from the sleep_export tool
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub rows: usize,
    pub csv: String,
    pub message: String,
}

/// Quote a CSV field when it contains a delimiter, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Export all closed periods for a child as CSV text
pub fn export_sleep<S: SleepStorage>(
    storage: &S,
    params: ExportParams,
) -> Result<ExportResponse, ToolError> {
    let profile = storage.find_child(params.child.trim())?;
    let log = storage.load_log(&profile)?;

    let mut csv = String::from("start_time,end_time,duration,comment\n");
    let mut rows = 0;

    for period in log.periods() {
        let end = match period.end_time() {
            Some(end) => end,
            None => continue, // an open period has no fixed duration
        };
        csv.push_str(&format!(
            "{},{},{},{}\n",
            period.start_time().format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M"),
            period.format_duration_at(end),
            csv_field(period.comment())
        ));
        rows += 1;
    }

    let message = if rows == 0 {
        format!("No finished sleep periods for {} to export.", profile.name)
    } else {
        format!(
            "📈 Exported {} sleep period(s) for {}.\n\n{}",
            rows, profile.name, csv
        )
    };

    Ok(ExportResponse { rows, csv, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }
}
