/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the server loop that:
/// 1. Reads line-delimited JSON-RPC requests from stdin
/// 2. Dispatches tool calls against the habit storage
/// 3. Writes JSON-RPC responses to stdout
/// 4. Re-evaluates stored streaks on a fixed tick

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{HabitStreakServer, ServerError};

/// MCP server wrapping the habit streak service
pub struct McpServer {
    habit_tracker: HabitStreakServer,
    /// Whether the client has sent its initialized notification
    initialized: bool,
    reevaluate_every: Duration,
}

impl McpServer {
    pub fn new(habit_tracker: HabitStreakServer, reevaluate_every: Duration) -> Self {
        Self {
            habit_tracker,
            initialized: false,
            reevaluate_every: reevaluate_every.max(Duration::from_secs(1)),
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!(
            "Starting MCP server, re-evaluating streaks every {}s",
            self.reevaluate_every.as_secs()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        let mut ticker = interval_at(Instant::now() + self.reevaluate_every, self.reevaluate_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if let Some(response) = self.process_line(&line) {
                            let response_str = serde_json::to_string(&response)?;

                            stdout.write_all(response_str.as_bytes()).await?;
                            stdout.write_all(b"\n").await?;
                            stdout.flush().await?;

                            debug!("Sent response: {}", response_str);
                        }
                    }
                    Ok(None) => {
                        info!("MCP server shutting down (stdin closed)");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read from stdin: {}", e);
                        break;
                    }
                },
                _ = ticker.tick() => self.scheduled_reevaluation(),
            }
        }

        Ok(())
    }

    fn scheduled_reevaluation(&self) {
        let result = tools::reevaluate_streaks(
            self.habit_tracker.storage(),
            tools::ReevaluateParams::default(),
            Utc::now(),
        );
        if let Err(e) = result {
            warn!("Scheduled streak re-evaluation failed: {}", e);
        }
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

        self.handle_request(request)
    }

    /// Handle a JSON-RPC request; notifications produce no response
    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            if request.method.ends_with("initialized") {
                self.initialized = true;
                debug!("Client finished initialization");
            } else {
                debug!("Ignoring notification '{}'", request.method);
            }
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streak MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Self::success_value(id, &result)
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": tool_definitions() }))
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            debug!("Tool call '{}' before initialized notification", tool_params.name);
        }

        let storage = self.habit_tracker.storage();
        let now = Utc::now();
        let args = tool_params.arguments;

        let result = match tool_params.name.as_str() {
            "habit_create" => parse_args(args)
                .map(|p| Self::text_result(tools::create_habit(storage, p).map(|r| {
                    match &r.habit_id {
                        Some(habit_id) => format!("{}\nHabit ID: {}", r.message, habit_id),
                        None => r.message,
                    }
                }))),
            "habit_toggle" => parse_args(args)
                .map(|p| Self::text_result(tools::toggle_completion(storage, p, now).map(|r| r.message))),
            "habit_status" => parse_args(args)
                .map(|p| Self::text_result(tools::get_habit_status(storage, p, now).map(|r| r.message))),
            "habit_update" => parse_args(args)
                .map(|p| Self::text_result(tools::update_habit(storage, p, now).map(|r| r.message))),
            "habit_reevaluate" => parse_args(args)
                .map(|p| Self::text_result(tools::reevaluate_streaks(storage, p, now).map(|r| r.message))),
            _ => Ok(ToolCallResult::error(format!("Unknown tool: {}", tool_params.name))),
        };

        let result = result.unwrap_or_else(|invalid| invalid);
        Self::success_value(id, &result)
    }

    fn text_result<E: std::fmt::Display>(outcome: Result<String, E>) -> ToolCallResult {
        match outcome {
            Ok(message) => ToolCallResult::success(message),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    fn success_value<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize result: {}", e),
                None,
            ),
        }
    }
}

/// Deserialize tool arguments into a tool's parameter struct
fn parse_args<P: DeserializeOwned>(args: HashMap<String, Value>) -> Result<P, ToolCallResult> {
    let object = Value::Object(args.into_iter().collect());
    serde_json::from_value(object)
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "habit_create".to_string(),
            description: "Create a habit that is due on specific weekdays".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name of the habit"},
                    "frequency": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Weekday names the habit is due on, e.g. [\"monday\", \"friday\"]"
                    },
                    "timezone": {"type": "string", "description": "IANA timezone, e.g. America/Chicago (optional, defaults to UTC)"}
                },
                "required": ["name", "frequency"]
            }),
        },
        ToolDefinition {
            name: "habit_toggle".to_string(),
            description: "Mark a habit done for a day, or unmark it if already done".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string", "description": "ID of the habit"},
                    "date": {"type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD local date (optional, defaults to now)"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_status".to_string(),
            description: "Show whether habits are due and done today, and their current streaks".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string", "description": "ID of specific habit (optional - shows all active if omitted)"}
                },
                "required": []
            }),
        },
        ToolDefinition {
            name: "habit_update".to_string(),
            description: "Rename, reschedule, change timezone, pause or resume a habit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string", "description": "ID of the habit"},
                    "name": {"type": "string"},
                    "frequency": {"type": "array", "items": {"type": "string"}},
                    "timezone": {"type": "string"},
                    "is_active": {"type": "boolean"}
                },
                "required": ["habit_id"]
            }),
        },
        ToolDefinition {
            name: "habit_reevaluate".to_string(),
            description: "Recompute and store the streak of every active habit".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}
