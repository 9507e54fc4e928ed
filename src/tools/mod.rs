/// MCP tools for sleep tracking
///
/// This module contains all the MCP tools that external clients (like
/// Claude) can call to interact with the sleep tracker. Each tool owns its
/// params/response shapes and the user-facing message formatting; the
/// domain layer stays free of presentation concerns.

pub mod create;
pub mod export;
pub mod list;
pub mod log;
pub mod stats;
pub mod status;

// Re-export tool functions for easy access
pub use create::*;
pub use export::*;
pub use list::*;
pub use log::*;
pub use stats::*;
pub use status::*;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::{LogError, StateError, ValidationError};
use crate::storage::StorageError;

/// Errors surfaced by the tool layer
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    State(#[from] StateError),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl From<LogError> for ToolError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Validation(e) => ToolError::Validation(e),
            LogError::State(e) => ToolError::State(e),
        }
    }
}

/// Parse a timestamp parameter, with or without seconds
pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, ToolError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|_| {
            ToolError::InvalidParams(format!(
                "invalid time '{}', expected YYYY-MM-DD HH:MM[:SS]",
                s
            ))
        })
}

/// Parse a date parameter
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidParams(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Render whole minutes as "Hh MMm"
pub(crate) fn format_minutes(total_minutes: i64) -> String {
    format!("{}h {:02}m", total_minutes / 60, (total_minutes % 60).abs())
}
