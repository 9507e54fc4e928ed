/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Dispatches tool calls to the sleep tracker
/// 3. Sends JSON-RPC responses to stdout
///
/// The loop is single-threaded: every mutating tool call for a child runs
/// to completion before the next request is read, which serializes the
/// check-then-act sequences of the domain layer.

use std::collections::HashMap;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{ServerError, SleepTrackerServer};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying sleep tracker
    tracker: SleepTrackerServer,
    /// Whether the client finished the initialize handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tracker: SleepTrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request))
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Sleep Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                e.to_string(),
                None,
            ),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "child_create".to_string(),
                description: "Register a child to track sleep for".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Child's name"},
                        "birth_date": {"type": "string", "description": "Birth date (YYYY-MM-DD, not in the future)"}
                    },
                    "required": ["name", "birth_date"]
                }),
            },
            ToolDefinition {
                name: "child_list".to_string(),
                description: "List registered children with age and current sleep state".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "sleep_log".to_string(),
                description: "Record a sleep event: start a sleep, end the open one, or enter a missed (already finished) sleep".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "child": {"type": "string", "description": "Child's name"},
                        "action": {"type": "string", "description": "'start', 'end' or 'missed'"},
                        "time": {"type": "string", "description": "Event time for start/end (YYYY-MM-DD HH:MM, optional - defaults to now)"},
                        "start_time": {"type": "string", "description": "Start of a missed sleep (required for 'missed')"},
                        "end_time": {"type": "string", "description": "End of a missed sleep (required for 'missed')"},
                        "comment": {"type": "string", "description": "Optional note attached to the period"}
                    },
                    "required": ["child", "action"]
                }),
            },
            ToolDefinition {
                name: "sleep_status".to_string(),
                description: "Current sleep state: running duration of the open sleep, or time since the last one ended".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "child": {"type": "string", "description": "Child's name"}
                    },
                    "required": ["child"]
                }),
            },
            ToolDefinition {
                name: "sleep_stats".to_string(),
                description: "Daily sleep statistics: exact sleep/awake minutes for one calendar day, night sleep and naps split out".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "child": {"type": "string", "description": "Child's name"},
                        "date": {"type": "string", "description": "Target day (YYYY-MM-DD, optional - defaults to today)"}
                    },
                    "required": ["child"]
                }),
            },
            ToolDefinition {
                name: "sleep_export".to_string(),
                description: "Export the full sleep history as CSV".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "child": {"type": "string", "description": "Child's name"}
                    },
                    "required": ["child"]
                }),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self.dispatch_tool(&tool_params.name, tool_params.arguments);

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                e.to_string(),
                None,
            ),
        }
    }

    /// Route a tool call to its implementation
    fn dispatch_tool(&self, name: &str, args: HashMap<String, Value>) -> ToolCallResult {
        let storage = self.tracker.storage();

        match name {
            "child_create" => run_tool(args, |p| tools::create_child(storage, p)),
            "child_list" => run_tool(args, |p| tools::list_children(storage, p)),
            "sleep_log" => run_tool(args, |p| tools::log_sleep(storage, p)),
            "sleep_status" => run_tool(args, |p| tools::sleep_status(storage, p)),
            "sleep_stats" => run_tool(args, |p| tools::sleep_stats(storage, p)),
            "sleep_export" => run_tool(args, |p| tools::export_sleep(storage, p)),
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }
}

/// Deserialize the call arguments into a tool's params struct, run the
/// tool, and render the outcome as a tool result
fn run_tool<P, R, F>(args: HashMap<String, Value>, f: F) -> ToolCallResult
where
    P: DeserializeOwned,
    R: ToolMessage,
    F: FnOnce(P) -> Result<R, tools::ToolError>,
{
    let params: P = match serde_json::from_value(Value::Object(args.into_iter().collect())) {
        Ok(p) => p,
        Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
    };

    match f(params) {
        Ok(response) => ToolCallResult::success(response.message().to_string()),
        Err(e) => ToolCallResult::error(e.to_string()),
    }
}

/// A tool response that carries a user-facing message
trait ToolMessage {
    fn message(&self) -> &str;
}

macro_rules! tool_message {
    ($($ty:ty),* $(,)?) => {
        $(impl ToolMessage for $ty {
            fn message(&self) -> &str {
                &self.message
            }
        })*
    };
}

tool_message!(
    tools::CreateChildResponse,
    tools::ListChildrenResponse,
    tools::SleepLogResponse,
    tools::StatusResponse,
    tools::StatsResponse,
    tools::ExportResponse,
);
