//! Voicebridge CLI: record or transcribe through the voice-to-text helper.
//!
//! Transcripts go to stdout; status and diagnostics go to stderr so the
//! output can be piped into whatever consumes the text.

use anyhow::Result;
use clap::CommandFactory;
use std::time::Duration;
use voicebridge::config::AppConfig;
use voicebridge::doctor::run_doctor;
use voicebridge::{init_logging, log_debug, VoiceClient};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);

    if config.doctor {
        println!("{}", run_doctor(&config).render());
        return Ok(());
    }

    if config.transcribe.is_none() && !config.listen {
        AppConfig::command().print_help()?;
        return Ok(());
    }

    let client = VoiceClient::new(&config.server_path, &config.model_path)?
        .with_processing_grace(Duration::from_millis(config.grace_ms));

    let transcript = if let Some(path) = &config.transcribe {
        eprintln!("Transcribing {}...", path.display());
        client.transcribe_file(path)?
    } else {
        eprintln!(
            "Listening (max {:.1}s, silence timeout {:.1}s)...",
            config.timeout_ms as f64 / 1000.0,
            config.silence_timeout_ms as f64 / 1000.0
        );
        client.listen(
            config.timeout_ms,
            config.silence_timeout_ms,
            !config.no_auto_stop,
        )?
    };

    if transcript.is_empty() {
        // Empty is a valid outcome, distinct from every error category.
        eprintln!("No speech detected.");
        log_debug("call succeeded with an empty transcript");
    } else {
        println!("{transcript}");
    }
    Ok(())
}
