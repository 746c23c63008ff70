use super::AppConfig;
use clap::Parser;

#[test]
fn default_config_passes_validation() {
    let cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_timeout_out_of_bounds() {
    let cfg = AppConfig::parse_from(["test-app", "--timeout-ms", "50"]);
    assert!(cfg.validate().is_err());

    let cfg = AppConfig::parse_from(["test-app", "--timeout-ms", "600001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_timeout_bounds() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--timeout-ms",
        "100",
        "--silence-timeout-ms",
        "100",
    ]);
    assert!(cfg.validate().is_ok());

    let cfg = AppConfig::parse_from(["test-app", "--timeout-ms", "600000"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_silence_timeout_above_recording_timeout() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--timeout-ms",
        "1000",
        "--silence-timeout-ms",
        "2000",
    ]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_grace_out_of_bounds() {
    let cfg = AppConfig::parse_from(["test-app", "--grace-ms", "0"]);
    assert!(cfg.validate().is_err());

    let cfg = AppConfig::parse_from(["test-app", "--grace-ms", "120001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_listen_combined_with_transcribe() {
    let cfg = AppConfig::parse_from(["test-app", "--listen", "--transcribe", "clip.wav"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn transcribe_flag_captures_path() {
    let cfg = AppConfig::parse_from(["test-app", "--transcribe", "clips/request.wav"]);
    assert_eq!(
        cfg.transcribe.as_deref(),
        Some(std::path::Path::new("clips/request.wav"))
    );
}
