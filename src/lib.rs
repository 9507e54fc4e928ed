/// Public library interface for the Sleep Tracker MCP server
///
/// This module exports the main server implementation and the public
/// domain, storage and analytics types used by clients and tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod analytics;
mod domain;
mod mcp;
mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{DaySummary, RangeSummary, SleepAnalytics};
pub use domain::*;
pub use storage::{ChildProfile, SleepStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main sleep tracker server that implements the MCP protocol
///
/// The server keeps child sleep logs in a SQLite database and exposes
/// tools for recording sleep events and computing daily statistics.
pub struct SleepTrackerServer {
    storage: SqliteStorage,
    analytics: SleepAnalytics,
}

impl SleepTrackerServer {
    /// Create a new sleep tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Sleep Tracker server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let analytics = SleepAnalytics::new();

        Ok(Self { storage, analytics })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until the server is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let children = self.storage.list_children()?;
        tracing::info!(
            "Server started successfully, found {} registered children",
            children.len()
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine (useful for testing)
    pub fn analytics(&self) -> &SleepAnalytics {
        &self.analytics
    }
}
