/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication for the
/// sleep tracker: JSON-RPC parsing and tool routing over stdin/stdout.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::McpServer;
