use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn voicebridge_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_voicebridge").expect("voicebridge test binary not built")
}

#[test]
fn help_mentions_name() {
    let output = Command::new(voicebridge_bin())
        .arg("--help")
        .output()
        .expect("run voicebridge --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Voicebridge"));
    assert!(combined.contains("--listen"));
    assert!(combined.contains("--transcribe"));
}

#[test]
fn no_mode_prints_help_and_succeeds() {
    let output = Command::new(voicebridge_bin())
        .args(["--server", "/no/such/helper", "--model", "/no/such/model"])
        .output()
        .expect("run voicebridge with no mode");
    assert!(output.status.success());
    assert!(combined_output(&output).contains("--listen"));
}

#[test]
fn missing_server_path_fails_with_a_diagnostic() {
    let output = Command::new(voicebridge_bin())
        .args([
            "--server",
            "/no/such/helper",
            "--model",
            "/no/such/model.bin",
            "--listen",
        ])
        .output()
        .expect("run voicebridge --listen");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("helper binary not found"));
}

#[test]
fn rejects_out_of_range_timeout() {
    let output = Command::new(voicebridge_bin())
        .args(["--listen", "--timeout-ms", "1"])
        .output()
        .expect("run voicebridge with bad timeout");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--timeout-ms"));
}

#[test]
fn doctor_reports_missing_paths() {
    let output = Command::new(voicebridge_bin())
        .args([
            "--doctor",
            "--server",
            "/no/such/helper",
            "--model",
            "/no/such/model.bin",
        ])
        .output()
        .expect("run voicebridge --doctor");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("doctor report"));
    assert!(combined.contains("missing"));
}

#[cfg(unix)]
mod stub_server {
    use super::{combined_output, voicebridge_bin};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::process::Command;

    fn stub_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "voicebridge-cli-{tag}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("create stub dir");
        dir
    }

    fn write_stub(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("stub-server");
        fs::write(&path, script).expect("write stub server");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod stub");
        path
    }

    #[test]
    fn transcribe_prints_the_stub_transcript() {
        let dir = stub_dir("transcribe");
        let stub = write_stub(
            &dir,
            "#!/bin/sh\n\
             echo '{\"jsonrpc\":\"2.0\",\"id\":0,\"result\":{}}'\n\
             echo 'stderr-style banner on stdout'\n\
             echo '{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"content\":[{\"type\":\"text\",\"text\":\"window seat please\"}]}}'\n\
             cat >/dev/null\n",
        );
        let model = dir.join("model.bin");
        fs::write(&model, b"stub model").expect("write model");
        let audio = dir.join("clip.wav");
        fs::write(&audio, b"RIFF").expect("write audio");

        let output = Command::new(voicebridge_bin())
            .arg("--server")
            .arg(&stub)
            .arg("--model")
            .arg(&model)
            .arg("--transcribe")
            .arg(&audio)
            .args(["--grace-ms", "5000"])
            .output()
            .expect("run voicebridge --transcribe");
        assert!(output.status.success(), "{}", combined_output(&output));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout.trim(), "window seat please");
    }

    #[test]
    fn doctor_lists_tools_from_a_live_stub() {
        let dir = stub_dir("doctor");
        let stub = write_stub(
            &dir,
            "#!/bin/sh\n\
             echo '{\"jsonrpc\":\"2.0\",\"id\":0,\"result\":{}}'\n\
             echo '{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"tools\":[{\"name\":\"listen\",\"description\":\"record and transcribe\"}]}}'\n\
             cat >/dev/null\n",
        );
        let model = dir.join("model.bin");
        fs::write(&model, b"stub model").expect("write model");

        let output = Command::new(voicebridge_bin())
            .arg("--doctor")
            .arg("--server")
            .arg(&stub)
            .arg("--model")
            .arg(&model)
            .output()
            .expect("run voicebridge --doctor");
        assert!(output.status.success(), "{}", combined_output(&output));
        let combined = combined_output(&output);
        assert!(combined.contains("listen: record and transcribe"));
    }
}
