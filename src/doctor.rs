//! Environment diagnostics for the `--doctor` flag.
//!
//! Reports the configured paths and log locations, then probes the helper
//! with a live `tools/list` exchange so users can tell a missing binary
//! apart from a broken one.

use crate::config::AppConfig;
use crate::mcp::VoiceClient;
use crate::{log_file_path, telemetry};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Deadline for the `tools/list` probe; no recording is involved, so a short
/// wait is enough to catch a wedged helper.
const PROBE_GRACE: Duration = Duration::from_secs(10);

/// Accumulates report lines for plain-text rendering.
pub struct DoctorReport {
    lines: Vec<String>,
}

impl DoctorReport {
    pub fn new(title: &str) -> Self {
        Self {
            lines: vec![format!("{title} doctor report")],
        }
    }

    pub fn section(&mut self, name: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("[{name}]"));
    }

    pub fn push_kv(&mut self, key: &str, value: impl Display) {
        self.lines.push(format!("  {key}: {value}"));
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Build the full report, including the live helper probe.
pub fn run_doctor(config: &AppConfig) -> DoctorReport {
    let mut report = DoctorReport::new("voicebridge");
    report.push_kv("version", env!("CARGO_PKG_VERSION"));

    report.section("Helper");
    report.push_kv("server", config.server_path.display());
    report.push_kv("server_status", path_status(&config.server_path));
    report.push_kv("model", config.model_path.display());
    report.push_kv("model_status", path_status(&config.model_path));

    report.section("Logging");
    report.push_kv("debug_log", log_file_path().display());
    report.push_kv("trace_log", telemetry::tracing_log_path().display());

    report.section("Probe");
    match VoiceClient::new(&config.server_path, &config.model_path) {
        Ok(client) => {
            let client = client.with_processing_grace(PROBE_GRACE);
            match client.list_tools() {
                Ok(tools) if tools.is_empty() => {
                    report.push_kv("tools", "none advertised");
                }
                Ok(tools) => {
                    for tool in tools {
                        let description = tool.description.unwrap_or_default();
                        report.push_kv(&tool.name, description);
                    }
                }
                Err(err) => report.push_kv("probe_error", err),
            }
        }
        Err(err) => report.push_kv("probe_error", err),
    }

    report
}

fn path_status(path: &Path) -> String {
    match fs::metadata(path) {
        Ok(meta) => {
            let mut status = format!("present ({} bytes)", meta.len());
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if meta.is_file() && meta.permissions().mode() & 0o111 == 0 {
                    status.push_str(", not executable");
                }
            }
            status
        }
        Err(_) => "missing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn report_renders_sections_and_values() {
        let mut report = DoctorReport::new("voicebridge");
        report.section("Helper");
        report.push_kv("server", "/tmp/server");
        let rendered = report.render();
        assert!(rendered.contains("voicebridge doctor report"));
        assert!(rendered.contains("[Helper]"));
        assert!(rendered.contains("server: /tmp/server"));
    }

    #[test]
    fn missing_paths_reported_without_probing() {
        let config = AppConfig::parse_from([
            "test-app",
            "--server",
            "/no/such/helper",
            "--model",
            "/no/such/model.bin",
        ]);
        let rendered = run_doctor(&config).render();
        assert!(rendered.contains("server_status: missing"));
        assert!(rendered.contains("model_status: missing"));
        assert!(rendered.contains("probe_error"));
    }
}
