// Shared subprocess plumbing for the language runtimes

use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use super::error::{Result, RuntimeError};
use super::types::ExecutionResult;

/// Marker appended to captured output that hit the size cap
pub(crate) const TRUNCATION_MARKER: &str = "\n...(truncated)";

/// Raw outcome of one bounded child process run
pub(crate) struct ProcessOutcome {
    pub stdout: String,
    pub stderr: String,
    /// None when the child was killed by the deadline
    pub exit_code: Option<i32>,
    pub timed_out: bool,
}

/// Write generated source to a uniquely named temp file
///
/// The returned guard deletes the file when dropped, so cleanup happens on
/// every exit path including panics.
pub(crate) fn write_source(
    work_dir: &Path,
    suffix: &str,
    source: &str,
) -> Result<tempfile::NamedTempFile> {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .prefix("airlock_")
        .suffix(suffix)
        .tempfile_in(work_dir)
        .map_err(RuntimeError::TempFile)?;
    file.write_all(source.as_bytes())
        .map_err(RuntimeError::WriteCode)?;
    file.flush().map_err(RuntimeError::WriteCode)?;
    Ok(file)
}

/// Run a child process under a deadline, capturing capped stdout/stderr
///
/// Capture runs concurrently with the child and keeps draining past the cap
/// so a chatty child never blocks on a full pipe. On deadline the child is
/// killed and whatever was captured so far is returned.
pub(crate) async fn run_bounded(
    mut cmd: Command,
    deadline: Duration,
    max_output: usize,
) -> std::io::Result<ProcessOutcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take().expect("stdout is piped");
    let stderr = child.stderr.take().expect("stderr is piped");

    let stdout_task = tokio::spawn(read_capped(stdout, max_output));
    let stderr_task = tokio::spawn(read_capped(stderr, max_output));

    let (timed_out, status) = match tokio::time::timeout(deadline, child.wait()).await {
        Ok(status) => (false, Some(status?)),
        Err(_) => {
            debug!("deadline exceeded, killing child process");
            child.kill().await.ok();
            let _ = child.wait().await;
            (true, None)
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();

    Ok(ProcessOutcome {
        stdout,
        stderr,
        exit_code: status.map(|s| s.code().unwrap_or(-1)),
        timed_out,
    })
}

async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, max: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    let mut truncated = false;

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() < max {
                    let take = n.min(max - buf.len());
                    buf.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                } else {
                    truncated = true;
                }
            }
            Err(_) => break,
        }
    }

    let mut out = String::from_utf8_lossy(&buf).into_owned();
    if truncated {
        out.push_str(TRUNCATION_MARKER);
    }
    out
}

/// Classify a raw process outcome into an `ExecutionResult`
///
/// `parse_json` enables JSON sniffing of stdout; the shell runtime keeps
/// raw text output.
pub(crate) fn classify(outcome: ProcessOutcome, duration_ms: u64, parse_json: bool) -> ExecutionResult {
    if outcome.timed_out {
        return ExecutionResult {
            success: false,
            output: Value::Null,
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            error: "execution timeout".to_string(),
            exit_code: -1,
            duration_ms,
        };
    }

    let exit_code = outcome.exit_code.unwrap_or(-1);
    if exit_code != 0 {
        return ExecutionResult {
            success: false,
            output: Value::Null,
            error: outcome.stderr.clone(),
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            exit_code,
            duration_ms,
        };
    }

    let trimmed = outcome.stdout.trim();
    let output = if parse_json && (trimmed.starts_with('{') || trimmed.starts_with('[')) {
        serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
    } else {
        Value::String(trimmed.to_string())
    };

    ExecutionResult {
        success: true,
        output,
        stdout: outcome.stdout,
        stderr: outcome.stderr,
        error: String::new(),
        exit_code: 0,
        duration_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(stdout: &str, exit_code: Option<i32>, timed_out: bool) -> ProcessOutcome {
        ProcessOutcome {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code,
            timed_out,
        }
    }

    #[test]
    fn test_classify_plain_output() {
        let result = classify(outcome("30\n", Some(0), false), 5, true);
        assert!(result.success);
        assert_eq!(result.output, Value::String("30".to_string()));
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn test_classify_json_output() {
        let result = classify(outcome("{\"sum\": 30}\n", Some(0), false), 5, true);
        assert!(result.success);
        assert_eq!(result.output["sum"], 30);
    }

    #[test]
    fn test_classify_json_sniffing_disabled() {
        let result = classify(outcome("{\"sum\": 30}", Some(0), false), 5, false);
        assert_eq!(result.output, Value::String("{\"sum\": 30}".to_string()));
    }

    #[test]
    fn test_classify_malformed_json_falls_back_to_text() {
        let result = classify(outcome("{not json", Some(0), false), 5, true);
        assert_eq!(result.output, Value::String("{not json".to_string()));
    }

    #[test]
    fn test_classify_timeout() {
        let result = classify(outcome("partial", None, true), 1000, true);
        assert!(!result.success);
        assert_eq!(result.error, "execution timeout");
        assert_eq!(result.exit_code, -1);
        assert_eq!(result.stdout, "partial");
    }

    #[test]
    fn test_classify_nonzero_exit() {
        let mut raw = outcome("", Some(2), false);
        raw.stderr = "boom".to_string();
        let result = classify(raw, 5, true);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert_eq!(result.error, "boom");
    }
}
