//! High-level transcription client.
//!
//! A `VoiceClient` holds the helper binary and model paths (validated at
//! construction) and performs one full protocol exchange per call: spawn,
//! initialize handshake, `initialized` notification, single request,
//! correlated read, teardown. No state survives between calls and nothing is
//! retried; a failed call means "no transcription available" to the caller.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{DEFAULT_GRACE_MS, DEFAULT_TIMEOUT_MS};
use crate::{log_debug, log_debug_content};

use super::error::McpError;
use super::protocol::{
    first_content_text, tool_descriptors, NotificationEnvelope, RequestEnvelope, ToolDescriptor,
    CALL_ID,
};
use super::session::StdioSession;

/// Client for the subprocess-hosted speech-to-text helper.
#[derive(Debug)]
pub struct VoiceClient {
    server_path: PathBuf,
    model_path: PathBuf,
    /// Extra wall-clock budget on top of the per-call recording timeout,
    /// covering model inference after recording stops.
    processing_grace: Duration,
}

impl VoiceClient {
    /// Build a client, checking both paths up front so misconfiguration
    /// fails before any process is spawned.
    pub fn new(
        server_path: impl Into<PathBuf>,
        model_path: impl Into<PathBuf>,
    ) -> Result<Self, McpError> {
        let server_path = server_path.into();
        let model_path = model_path.into();
        if !server_path.exists() {
            return Err(McpError::Config(format!(
                "helper binary not found: {} (build voice-to-text-mcp first)",
                server_path.display()
            )));
        }
        if !model_path.exists() {
            return Err(McpError::Config(format!(
                "whisper model not found: {}",
                model_path.display()
            )));
        }
        Ok(Self {
            server_path,
            model_path,
            processing_grace: Duration::from_millis(DEFAULT_GRACE_MS),
        })
    }

    /// Override the processing grace added to every call deadline.
    pub fn with_processing_grace(mut self, grace: Duration) -> Self {
        self.processing_grace = grace;
        self
    }

    /// Record from the microphone and return the transcript.
    ///
    /// An empty string means the helper detected no speech; that is a
    /// successful outcome, not an error.
    pub fn listen(
        &self,
        timeout_ms: u64,
        silence_timeout_ms: u64,
        auto_stop: bool,
    ) -> Result<String, McpError> {
        let mut arguments = Map::new();
        arguments.insert("timeout_ms".to_string(), Value::from(timeout_ms));
        arguments.insert(
            "silence_timeout_ms".to_string(),
            Value::from(silence_timeout_ms),
        );
        arguments.insert("auto_stop".to_string(), Value::from(auto_stop));
        let result = self.invoke_tool("listen", arguments)?;
        let text = first_content_text(&result).unwrap_or_default();
        log_debug_content(&format!("listen transcript: '{text}'"));
        Ok(text)
    }

    /// Transcribe an existing audio file.
    pub fn transcribe_file(&self, path: &Path) -> Result<String, McpError> {
        if !path.exists() {
            return Err(McpError::NotFound(path.to_path_buf()));
        }
        let mut arguments = Map::new();
        arguments.insert(
            "file_path".to_string(),
            Value::from(path.to_string_lossy().into_owned()),
        );
        let result = self.invoke_tool("transcribe_file", arguments)?;
        let text = first_content_text(&result).unwrap_or_default();
        log_debug_content(&format!("file transcript: '{text}'"));
        Ok(text)
    }

    /// Ask the helper which tools it advertises.
    pub fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let result = self.call(RequestEnvelope::tool_list(), self.processing_grace)?;
        Ok(tool_descriptors(&result))
    }

    /// Invoke a named tool with the argument map passed through verbatim.
    /// Returns the raw result payload.
    pub fn invoke_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<Value, McpError> {
        let budget = call_budget(&arguments, self.processing_grace);
        self.call(RequestEnvelope::tool_call(name, arguments), budget)
    }

    fn call(&self, request: RequestEnvelope, budget: Duration) -> Result<Value, McpError> {
        let method = request.method;
        let started = Instant::now();
        let deadline = started + budget;

        let mut session = StdioSession::spawn(&self.server_path, &self.model_path)?;
        let outcome = run_exchange(&mut session, &request, deadline, started);
        // Teardown happens on every path before the outcome is surfaced.
        let status = session.shutdown();

        let elapsed = started.elapsed();
        log_debug(&format!(
            "helper exited with {status:?} after {elapsed:?} ({method})"
        ));
        tracing::debug!(
            method,
            elapsed_ms = elapsed.as_millis() as u64,
            exited = status.is_some(),
            "session closed"
        );

        match outcome? {
            Some(envelope) => match envelope.error {
                Some(payload) => Err(McpError::Tool(payload)),
                None => Ok(envelope.result.unwrap_or(Value::Null)),
            },
            None => Err(McpError::Protocol(
                "helper exited without answering the pending request".to_string(),
            )),
        }
    }
}

fn run_exchange(
    session: &mut StdioSession,
    request: &RequestEnvelope,
    deadline: Instant,
    started: Instant,
) -> Result<Option<super::protocol::ResponseEnvelope>, McpError> {
    session.send(&RequestEnvelope::initialize())?;
    // One reply line, content deliberately not validated: the helper may
    // prepend startup banners and the original protocol tolerates them.
    let handshake = session.read_line(deadline, started)?;
    log_debug_content(&format!("initialize reply: {handshake}"));
    session.send(&NotificationEnvelope::initialized())?;
    session.send(request)?;
    session.await_response(CALL_ID, deadline, started)
}

/// Deadline budget for one tool call: the caller-supplied recording timeout
/// (or the default when the tool takes none) plus the processing grace.
pub(super) fn call_budget(arguments: &Map<String, Value>, grace: Duration) -> Duration {
    let timeout_ms = arguments
        .get("timeout_ms")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    Duration::from_millis(timeout_ms) + grace
}
