pub mod config;
pub mod doctor;
pub mod mcp;

mod logging;
mod telemetry;

pub use logging::{init_logging, log_debug, log_debug_content, log_file_path};
pub use mcp::{McpError, VoiceClient};
