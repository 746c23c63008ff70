//! Client for the voice-to-text helper subprocess.
//!
//! The helper is an external binary speaking newline-delimited JSON-RPC 2.0
//! over stdin/stdout. Each call owns one subprocess end to end: spawn,
//! handshake, single request, deadline-bounded correlated read, guaranteed
//! teardown.

mod client;
mod error;
pub mod protocol;
mod session;

pub use client::VoiceClient;
pub use error::McpError;
pub use protocol::{first_content_text, RpcErrorPayload, ToolDescriptor};
