//! One subprocess lifecycle: spawn the helper, exchange newline-delimited
//! JSON, and guarantee teardown.
//!
//! The helper's stdout is drained by a dedicated reader thread feeding a
//! bounded channel, so the caller can wait for lines with a wall-clock
//! deadline instead of blocking on the pipe directly. Sessions are never
//! reused; every call spawns and tears down its own process.

use crate::log_debug;
use anyhow::{anyhow, Context};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::error::McpError;
use super::protocol::ResponseEnvelope;

/// Max buffered stdout lines before the reader thread applies backpressure.
const LINE_CHANNEL_CAPACITY: usize = 256;

/// How long a terminated helper gets to exit before SIGKILL.
const TERM_GRACE: Duration = Duration::from_secs(2);

/// Poll interval while waiting for the child to be reaped.
const REAP_POLL: Duration = Duration::from_millis(50);

/// Upper bound on a single channel wait so deadline checks stay responsive.
const READ_SLICE: Duration = Duration::from_millis(100);

/// An owned helper process with piped stdin/stdout/stderr.
pub(super) struct StdioSession {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    reader: Option<JoinHandle<()>>,
}

impl StdioSession {
    /// Spawn `<server> --mcp-server <model>` with all three streams piped.
    pub(super) fn spawn(server: &Path, model: &Path) -> Result<Self, McpError> {
        let mut child = Command::new(server)
            .arg("--mcp-server")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn helper '{}'", server.display()))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::Runtime(anyhow!("helper stdin was not piped")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::Runtime(anyhow!("helper stdout was not piped")))?;

        let (line_tx, line_rx) = bounded(LINE_CHANNEL_CAPACITY);
        let reader = thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            lines: line_rx,
            reader: Some(reader),
        })
    }

    /// Write one message as a JSON line and flush.
    pub(super) fn send<T: Serialize>(&mut self, message: &T) -> Result<(), McpError> {
        let json = serde_json::to_string(message).context("failed to encode request")?;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| McpError::Runtime(anyhow!("helper stdin already closed")))?;
        writeln!(stdin, "{json}").context("failed to write to helper stdin")?;
        stdin.flush().context("failed to flush helper stdin")?;
        Ok(())
    }

    /// Read the next stdout line, whatever it contains, bounded by the deadline.
    ///
    /// Used for the initialize handshake, where one reply line is consumed
    /// without schema validation.
    pub(super) fn read_line(
        &mut self,
        deadline: Instant,
        started: Instant,
    ) -> Result<String, McpError> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(McpError::Timeout {
                    waited: now.duration_since(started),
                });
            }
            match self.lines.recv_timeout(remaining_slice(deadline, now)) {
                Ok(line) => return Ok(line),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(McpError::Runtime(anyhow!(
                        "helper closed stdout during startup"
                    )))
                }
            }
        }
    }

    /// Scan stdout for the response correlated to `id`.
    ///
    /// Lines that are not JSON, or that carry a different id, are skipped;
    /// the helper interleaves diagnostics on the same stream. Returns
    /// `Ok(None)` when stdout ends and the process has exited without
    /// answering, and `Timeout` once the deadline passes.
    pub(super) fn await_response(
        &mut self,
        id: u64,
        deadline: Instant,
        started: Instant,
    ) -> Result<Option<ResponseEnvelope>, McpError> {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(McpError::Timeout {
                    waited: now.duration_since(started),
                });
            }
            match self.lines.recv_timeout(remaining_slice(deadline, now)) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ResponseEnvelope>(line) {
                        Ok(envelope) if envelope.id == Some(id) => return Ok(Some(envelope)),
                        Ok(_) => continue,
                        Err(_) => {
                            log_debug("skipping non-protocol line on helper stdout");
                            continue;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => match self.child.try_wait() {
                    Ok(Some(_)) => return Ok(None),
                    // stdout is gone but the process lingers; keep waiting
                    // for an exit until the deadline says otherwise
                    Ok(None) => thread::sleep(REAP_POLL),
                    Err(err) => return Err(err.into()),
                },
            }
        }
    }

    /// Tear the session down: close stdin, terminate, escalate to kill after
    /// the grace period, and reap. Returns the exit status when the child
    /// was successfully waited on.
    pub(super) fn shutdown(self) -> Option<ExitStatus> {
        let StdioSession {
            mut child,
            stdin,
            lines,
            reader,
        } = self;
        // Closing stdin lets a well-behaved helper exit on its own.
        drop(stdin);

        let status = terminate_child(&mut child);

        // Dropping the receiver unblocks a reader stuck on a full channel.
        drop(lines);
        if let Some(handle) = reader {
            let _ = handle.join();
        }
        status
    }
}

fn remaining_slice(deadline: Instant, now: Instant) -> Duration {
    deadline.duration_since(now).min(READ_SLICE)
}

fn terminate_child(child: &mut Child) -> Option<ExitStatus> {
    if let Ok(Some(status)) = child.try_wait() {
        return Some(status);
    }
    send_term(child);
    let term_sent = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) => {}
            Err(err) => {
                log_debug(&format!("failed to poll helper exit: {err}"));
                return None;
            }
        }
        if should_force_kill(term_sent, Instant::now()) {
            let _ = child.kill();
            return child.wait().ok();
        }
        thread::sleep(REAP_POLL);
    }
}

/// SIGKILL only after the helper has had the full grace period to exit.
pub(super) fn should_force_kill(term_sent_at: Instant, now: Instant) -> bool {
    now.duration_since(term_sent_at) >= TERM_GRACE
}

#[cfg(unix)]
fn send_term(child: &mut Child) {
    let pid = child.id();
    // SAFETY: plain kill(2) on a pid this process owns; no memory is touched.
    unsafe {
        if libc::kill(pid as i32, libc::SIGTERM) != 0 {
            log_debug(&format!(
                "failed to send SIGTERM to helper pid {pid}: {}",
                std::io::Error::last_os_error()
            ));
        }
    }
}

#[cfg(not(unix))]
fn send_term(child: &mut Child) {
    // No graceful signal on this platform; go straight to kill.
    let _ = child.kill();
}
