//! Line-delimited JSON-RPC envelopes for the speech-to-text helper.
//!
//! The helper speaks MCP-shaped JSON-RPC 2.0 over its stdin/stdout, one
//! message per line. Within a single session exactly two ids are ever used:
//! `0` for the initialize handshake and `1` for the one method call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol revision sent in the initialize handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Request id reserved for the initialize handshake.
pub const INIT_ID: u64 = 0;

/// Request id reserved for the single method call of a session.
pub const CALL_ID: u64 = 1;

// ============================================================================
// Requests (client → helper)
// ============================================================================

/// A numbered request expecting a correlated response.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Value,
}

/// A fire-and-forget notification (no id, no response).
#[derive(Debug, Serialize)]
pub struct NotificationEnvelope {
    pub jsonrpc: &'static str,
    pub method: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    protocol_version: &'static str,
    capabilities: Map<String, Value>,
    client_info: ClientInfo,
}

#[derive(Debug, Serialize)]
struct ClientInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ToolCallParams {
    name: String,
    arguments: Map<String, Value>,
}

impl RequestEnvelope {
    /// Initialize handshake request, always id `0`.
    pub fn initialize() -> Self {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION,
            capabilities: Map::new(),
            client_info: ClientInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
        };
        Self {
            jsonrpc: "2.0",
            id: INIT_ID,
            method: "initialize",
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }

    /// `tools/call` request carrying the argument map verbatim, always id `1`.
    pub fn tool_call(name: &str, arguments: Map<String, Value>) -> Self {
        let params = ToolCallParams {
            name: name.to_string(),
            arguments,
        };
        Self {
            jsonrpc: "2.0",
            id: CALL_ID,
            method: "tools/call",
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }

    /// `tools/list` request, always id `1`.
    pub fn tool_list() -> Self {
        Self {
            jsonrpc: "2.0",
            id: CALL_ID,
            method: "tools/list",
            params: Value::Object(Map::new()),
        }
    }
}

impl NotificationEnvelope {
    /// Sent after the initialize response to complete the handshake.
    pub fn initialized() -> Self {
        Self {
            jsonrpc: "2.0",
            method: "notifications/initialized",
        }
    }
}

// ============================================================================
// Responses (helper → client)
// ============================================================================

/// A parsed response line. Lines that do not deserialize into this shape are
/// treated as diagnostic noise and skipped by the session read loop.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorPayload>,
}

/// Error payload reported by the helper for a numbered request.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorPayload {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// A tool advertised by the helper via `tools/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Pull the transcript out of a `tools/call` result.
///
/// A well-formed result is a mapping with a `content` sequence whose first
/// item carries a `text` field. Anything else (missing content, empty
/// sequence, non-object result) means no transcript and yields `None` rather
/// than an error; the helper reports "no speech" this way.
pub fn first_content_text(result: &Value) -> Option<String> {
    let text = result
        .as_object()?
        .get("content")?
        .as_array()?
        .first()?
        .as_object()?
        .get("text")?
        .as_str()?;
    Some(text.to_string())
}

/// Parse the tool descriptors out of a `tools/list` result.
pub fn tool_descriptors(result: &Value) -> Vec<ToolDescriptor> {
    result
        .as_object()
        .and_then(|obj| obj.get("tools"))
        .and_then(|tools| serde_json::from_value(tools.clone()).ok())
        .unwrap_or_default()
}
