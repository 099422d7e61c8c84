//! Stdio Tool Server
//!
//! JSON-RPC 2.0 over line-delimited stdin/stdout. Each request is one line
//! of JSON and gets exactly one line back; notifications get nothing.
//! Tool failures are reported inside a successful `tools/call` result with
//! `isError: true`, so a caller always receives a value.

use crate::service::{CallAnalysisService, ServiceError, SERVER_NAME, SERVER_VERSION};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

// ============================================================
// WIRE TYPES
// ============================================================

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct TranscriptArgs {
    transcript_id: i64,
}

#[derive(Debug, Deserialize)]
struct CustomerArgs {
    customer_id: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    transcript_id: i64,
    #[serde(default)]
    customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisArgs {
    analysis_id: i64,
}

// ============================================================
// TOOL CATALOG
// ============================================================

fn schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Tool descriptors advertised by `tools/list`
pub fn tool_catalog() -> Vec<Value> {
    let transcript_id = json!({ "transcript_id": { "type": "integer", "description": "Transcript ID" } });
    let customer_id = json!({ "customer_id": { "type": "string", "description": "Customer ID" } });

    vec![
        json!({
            "name": "get_transcript",
            "description": "Fetch a call transcript by ID",
            "inputSchema": schema(transcript_id, &["transcript_id"]),
        }),
        json!({
            "name": "list_all_transcripts",
            "description": "List all available call transcripts",
            "inputSchema": schema(json!({}), &[]),
        }),
        json!({
            "name": "get_customer_transcripts",
            "description": "Fetch all call transcripts for a customer",
            "inputSchema": schema(customer_id.clone(), &["customer_id"]),
        }),
        json!({
            "name": "analyze_transcript",
            "description": "Extract intent and sentiment from a transcript and save the result",
            "inputSchema": schema(
                json!({
                    "transcript_id": { "type": "integer", "description": "Transcript ID" },
                    "customer_id": { "type": "string", "description": "Customer ID (defaults to the transcript's customer)" },
                }),
                &["transcript_id"],
            ),
        }),
        json!({
            "name": "get_analysis_result",
            "description": "Retrieve a previously saved analysis result",
            "inputSchema": schema(
                json!({ "analysis_id": { "type": "integer", "description": "Analysis ID" } }),
                &["analysis_id"],
            ),
        }),
        json!({
            "name": "get_customer_analysis_history",
            "description": "Fetch all analysis results for a customer",
            "inputSchema": schema(customer_id.clone(), &["customer_id"]),
        }),
        json!({
            "name": "batch_analyze_customer",
            "description": "Analyze every transcript of a customer in one call",
            "inputSchema": schema(customer_id, &["customer_id"]),
        }),
        json!({
            "name": "server_health",
            "description": "Server status and available tools",
            "inputSchema": schema(json!({}), &[]),
        }),
    ]
}

// ============================================================
// DISPATCH
// ============================================================

pub struct ToolServer {
    service: CallAnalysisService,
}

/// Why a tool call could not produce a result
enum ToolFailure {
    /// Bad name or arguments: a JSON-RPC error
    Params(String),
    /// The tool ran and failed: an `isError` result
    Service(ServiceError),
    /// The result could not be encoded
    Internal(String),
}

impl From<ServiceError> for ToolFailure {
    fn from(e: ServiceError) -> Self {
        ToolFailure::Service(e)
    }
}

fn args<T: for<'de> Deserialize<'de>>(tool: &str, arguments: Value) -> Result<T, ToolFailure> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| ToolFailure::Params(format!("Invalid arguments for {}: {}", tool, e)))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ToolFailure> {
    serde_json::to_value(value)
        .map_err(|e| ToolFailure::Internal(format!("Failed to encode tool result: {}", e)))
}

impl ToolServer {
    pub fn new(service: CallAnalysisService) -> Self {
        Self { service }
    }

    fn call_tool(&self, name: &str, arguments: Value) -> Result<Value, ToolFailure> {
        let service = &self.service;
        match name {
            "get_transcript" => {
                let a: TranscriptArgs = args(name, arguments)?;
                to_value(service.get_transcript(a.transcript_id)?)
            }
            "list_all_transcripts" => to_value(service.list_transcripts()?),
            "get_customer_transcripts" => {
                let a: CustomerArgs = args(name, arguments)?;
                to_value(service.customer_transcripts(&a.customer_id)?)
            }
            "analyze_transcript" => {
                let a: AnalyzeArgs = args(name, arguments)?;
                to_value(service.analyze_transcript(a.transcript_id, a.customer_id.as_deref())?)
            }
            "get_analysis_result" => {
                let a: AnalysisArgs = args(name, arguments)?;
                to_value(service.get_analysis(a.analysis_id)?)
            }
            "get_customer_analysis_history" => {
                let a: CustomerArgs = args(name, arguments)?;
                to_value(service.customer_analysis_history(&a.customer_id)?)
            }
            "batch_analyze_customer" => {
                let a: CustomerArgs = args(name, arguments)?;
                to_value(service.batch_analyze_customer(&a.customer_id)?)
            }
            "server_health" => to_value(service.health()),
            other => Err(ToolFailure::Params(format!("Unknown tool: {}", other))),
        }
    }

    fn tool_result(payload: Value, is_error: bool) -> Value {
        json!({
            "content": [{ "type": "text", "text": payload.to_string() }],
            "structuredContent": payload,
            "isError": is_error,
        })
    }

    fn dispatch(&self, request: RpcRequest) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_catalog() })),
            "tools/call" => {
                let params: CallParams = serde_json::from_value(request.params).map_err(|e| RpcError {
                    code: INVALID_PARAMS,
                    message: format!("Invalid tools/call params: {}", e),
                })?;
                debug!("tools/call {}", params.name);
                match self.call_tool(&params.name, params.arguments) {
                    Ok(payload) => Ok(Self::tool_result(payload, false)),
                    Err(ToolFailure::Service(e)) => {
                        warn!("Tool {} failed: {}", params.name, e);
                        Ok(Self::tool_result(e.to_json(), true))
                    }
                    Err(ToolFailure::Params(message)) => Err(RpcError {
                        code: INVALID_PARAMS,
                        message,
                    }),
                    Err(ToolFailure::Internal(message)) => {
                        warn!("Tool {} failed: {}", params.name, message);
                        Err(RpcError {
                            code: INTERNAL_ERROR,
                            message,
                        })
                    }
                }
            }
            other => Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", other),
            }),
        }
    }

    /// Handle one line of input, returning the line to write back (if any)
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => return Self::parse_error(e),
        };

        // A notification omits `id`; an explicit null still gets a reply
        let id = raw.get("id").cloned();
        let request: RpcRequest = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                let resp = RpcResponse::err(
                    id.unwrap_or(Value::Null),
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                );
                return serde_json::to_string(&resp).ok();
            }
        };

        if request.jsonrpc.as_deref().is_some_and(|v| v != "2.0") {
            let resp = RpcResponse::err(
                id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "Unsupported jsonrpc version",
            );
            return serde_json::to_string(&resp).ok();
        }

        let id = id?;
        let resp = match self.dispatch(request) {
            Ok(result) => RpcResponse::ok(id, result),
            Err(error) => RpcResponse::err(id, error.code, error.message),
        };
        serde_json::to_string(&resp).ok()
    }

    fn parse_error(cause: impl std::fmt::Display) -> Option<String> {
        let resp = RpcResponse::err(Value::Null, PARSE_ERROR, format!("Parse error: {}", cause));
        serde_json::to_string(&resp).ok()
    }

    /// Handle one raw input line; bytes that are not UTF-8 are a parse error
    pub fn handle_bytes(&self, bytes: &[u8]) -> Option<String> {
        match std::str::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => self.handle_line(line),
            Err(e) => {
                debug!("Rejected non UTF-8 input line");
                Self::parse_error(e)
            }
        }
    }

    /// Serve requests from stdin until it closes
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        info!("{} {} listening on stdio", SERVER_NAME, SERVER_VERSION);
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if let Some(response) = self.handle_bytes(&buf) {
                stdout.write_all(response.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, tool server exiting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{seed::seed_sample_data, store::TranscriptStore};

    fn server() -> ToolServer {
        let store = TranscriptStore::in_memory().unwrap();
        seed_sample_data(&store).unwrap();
        ToolServer::new(CallAnalysisService::new(store))
    }

    fn call(server: &ToolServer, line: &str) -> Value {
        serde_json::from_str(&server.handle_line(line).unwrap()).unwrap()
    }

    #[test]
    fn test_tools_list() {
        let server = server();
        let resp = call(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        let tools = resp["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        assert_eq!(tools[3]["name"], "analyze_transcript");
    }

    #[test]
    fn test_notification_has_no_response() {
        let server = server();
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
    }

    #[test]
    fn test_parse_and_method_errors() {
        let server = server();
        let resp = call(&server, "{not json");
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert_eq!(resp["id"], Value::Null);

        let resp = call(&server, r#"{"jsonrpc":"2.0","id":"a","method":"resources/list"}"#);
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(resp["id"], "a");
    }

    #[test]
    fn test_null_id_still_gets_response() {
        let server = server();
        let resp = call(&server, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#);
        assert_eq!(resp["id"], Value::Null);
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let server = server();
        let resp: Value = serde_json::from_str(&server.handle_bytes(b"\xff\xfe bad\n").unwrap()).unwrap();
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert_eq!(resp["id"], Value::Null);

        assert!(server.handle_bytes(b"  \n").is_none());
        let resp: Value =
            serde_json::from_str(&server.handle_bytes(b"{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n").unwrap())
                .unwrap();
        assert_eq!(resp["id"], 9);
    }

    #[test]
    fn test_unencodable_result_is_internal_failure() {
        let mut bad = std::collections::BTreeMap::new();
        bad.insert((1, 2), "tuple keys cannot become JSON object keys");
        assert!(matches!(to_value(bad), Err(ToolFailure::Internal(_))));
    }

    #[test]
    fn test_unknown_transcript_is_tool_error() {
        let server = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_transcript","arguments":{"transcript_id":777}}}"#,
        );
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["structuredContent"]["error"], "Transcript 777 not found");
    }

    #[test]
    fn test_bad_arguments_are_invalid_params() {
        let server = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_transcript","arguments":{}}}"#,
        );
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);

        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"no_such_tool"}}"#,
        );
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_server_health_tool() {
        let server = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"server_health"}}"#,
        );
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(resp["result"]["structuredContent"]["status"], "healthy");
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("batch_analyze_customer"));
    }
}
