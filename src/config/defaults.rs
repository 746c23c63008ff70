//! Default values and validation bounds for CLI options.

/// Where the helper binary lands after `cargo build --release` in the
/// voice-to-text-mcp checkout.
pub const DEFAULT_SERVER_PATH: &str = "voice-to-text-mcp/target/release/voice-to-text-mcp";

/// Model fetched by the helper's download script.
pub const DEFAULT_MODEL_PATH: &str = "voice-to-text-mcp/models/ggml-base.en.bin";

/// Maximum recording duration (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Trailing silence that stops a recording (milliseconds).
pub const DEFAULT_SILENCE_TIMEOUT_MS: u64 = 2_000;

/// Extra budget for model inference after recording stops (milliseconds).
pub const DEFAULT_GRACE_MS: u64 = 30_000;

pub const MIN_TIMEOUT_MS: u64 = 100;
pub const MAX_TIMEOUT_MS: u64 = 600_000;

pub const MIN_GRACE_MS: u64 = 100;
pub const MAX_GRACE_MS: u64 = 120_000;
