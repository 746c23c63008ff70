use super::defaults::{MAX_GRACE_MS, MAX_TIMEOUT_MS, MIN_GRACE_MS, MIN_TIMEOUT_MS};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values. Filesystem existence of the server binary, model,
    /// and audio file is the client's job; only numeric ranges and mode
    /// combinations are enforced here.
    pub fn validate(&self) -> Result<()> {
        if self.listen && self.transcribe.is_some() {
            bail!("--listen and --transcribe are mutually exclusive");
        }
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            bail!(
                "--timeout-ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}, got {}",
                self.timeout_ms
            );
        }
        if self.silence_timeout_ms < MIN_TIMEOUT_MS || self.silence_timeout_ms > self.timeout_ms {
            bail!(
                "--silence-timeout-ms must be >={MIN_TIMEOUT_MS} and <= --timeout-ms ({})",
                self.timeout_ms
            );
        }
        if !(MIN_GRACE_MS..=MAX_GRACE_MS).contains(&self.grace_ms) {
            bail!(
                "--grace-ms must be between {MIN_GRACE_MS} and {MAX_GRACE_MS}, got {}",
                self.grace_ms
            );
        }
        Ok(())
    }
}
