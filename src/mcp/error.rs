use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::protocol::RpcErrorPayload;

/// Failure categories for one transcription call.
///
/// Nothing here is retried internally; callers are expected to treat any of
/// these as "no transcription available" and report a short diagnostic.
#[derive(Debug)]
pub enum McpError {
    /// Server binary or model file missing at client construction.
    Config(String),
    /// Audio file missing at `transcribe_file` entry; checked before spawning.
    NotFound(PathBuf),
    /// The session ended without a response correlated to the pending id.
    Protocol(String),
    /// The helper answered the pending id with an error payload.
    Tool(RpcErrorPayload),
    /// The wall-clock deadline passed while awaiting the response.
    Timeout { waited: Duration },
    /// Spawn failure, broken pipe, or unexpected process death.
    Runtime(anyhow::Error),
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McpError::Config(msg) => write!(f, "configuration error: {msg}"),
            McpError::NotFound(path) => {
                write!(f, "audio file not found: {}", path.display())
            }
            McpError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            McpError::Tool(payload) => {
                write!(f, "tool error {}: {}", payload.code, payload.message)
            }
            McpError::Timeout { waited } => {
                write!(f, "no response within {:.1}s", waited.as_secs_f64())
            }
            McpError::Runtime(err) => write!(f, "transcription call failed: {err:#}"),
        }
    }
}

impl std::error::Error for McpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            McpError::Runtime(err) => err.source(),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        McpError::Runtime(err)
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Runtime(err.into())
    }
}
