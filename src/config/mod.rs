//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_GRACE_MS, DEFAULT_MODEL_PATH, DEFAULT_SERVER_PATH, DEFAULT_SILENCE_TIMEOUT_MS,
    DEFAULT_TIMEOUT_MS, MAX_GRACE_MS, MAX_TIMEOUT_MS, MIN_GRACE_MS, MIN_TIMEOUT_MS,
};

/// CLI options for the voicebridge client. Validated values keep the helper
/// subprocess invocation safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "Voicebridge speech-to-text client", author, version)]
pub struct AppConfig {
    /// Path to the voice-to-text helper binary
    #[arg(long = "server", env = "VOICEBRIDGE_SERVER", default_value = DEFAULT_SERVER_PATH)]
    pub server_path: PathBuf,

    /// Path to the Whisper model the helper loads
    #[arg(long = "model", env = "VOICEBRIDGE_MODEL", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Record from the microphone and print the transcript
    #[arg(long, default_value_t = false)]
    pub listen: bool,

    /// Transcribe an existing WAV file
    #[arg(long, value_name = "FILE")]
    pub transcribe: Option<PathBuf>,

    /// Print environment diagnostics and probe the helper, then exit
    #[arg(long, default_value_t = false)]
    pub doctor: bool,

    /// Maximum recording duration (milliseconds)
    #[arg(long = "timeout-ms", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Stop recording after this much trailing silence (milliseconds)
    #[arg(long = "silence-timeout-ms", default_value_t = DEFAULT_SILENCE_TIMEOUT_MS)]
    pub silence_timeout_ms: u64,

    /// Keep recording through silence until the timeout elapses
    #[arg(long = "no-auto-stop", default_value_t = false)]
    pub no_auto_stop: bool,

    /// Extra wall-clock budget for model processing after recording (milliseconds)
    #[arg(long = "grace-ms", default_value_t = DEFAULT_GRACE_MS)]
    pub grace_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "VOICEBRIDGE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "VOICEBRIDGE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging transcript snippets (debug log only)
    #[arg(
        long = "log-content",
        env = "VOICEBRIDGE_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}
