//! External command execution with concurrent pipe draining

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::errors::{remediation_for, ErrorCategory};
use crate::core::config::READ_CHUNK_SIZE;

/// Sink for output lines while a command runs
pub type LineSender = UnboundedSender<String>;

// Conventional shell exit code for "command not found"
const EXIT_CODE_NOT_FOUND: i32 = 127;
// Reported when the process ended without an exit code (signal, timeout)
const EXIT_CODE_NONE: i32 = -1;

// Output is classified by its text, so it must not be translated
const LOCALE_ENV_VAR: &str = "LC_ALL";
const STABLE_LOCALE: &str = "C";
const LANGUAGE_ENV_VAR: &str = "LANGUAGE";

/// Program, ordered arguments and working directory of one external command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Renders the command for logs and messages
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of one external command invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Set by the runner for failures that never produced stderr to classify
    pub error_category: Option<ErrorCategory>,
}

impl OperationResult {
    fn failed(category: ErrorCategory, exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            success: false,
            exit_code,
            stdout,
            stderr,
            error_category: Some(category),
        }
    }
}

/// Spawns external commands and captures their output
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Runs a command to completion
    ///
    /// Both pipes are drained concurrently while the process runs; every line
    /// (split on `\n` or `\r`) is also forwarded to `lines` when given. The
    /// command runs under the C locale. Spawn failures and timeouts come back
    /// as failed results, never as errors; a timed out result keeps whatever
    /// output was read before the process was killed.
    pub async fn run(&self, spec: &CommandSpec, lines: Option<LineSender>) -> OperationResult {
        debug!("running `{}` in {}", spec.display(), spec.working_dir.display());

        let mut child = match Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .env(LOCALE_ENV_VAR, STABLE_LOCALE)
            .env_remove(LANGUAGE_ENV_VAR)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("failed to start `{}`: {e}", spec.program);
                return OperationResult::failed(
                    ErrorCategory::ToolingMissing,
                    EXIT_CODE_NOT_FOUND,
                    String::new(),
                    remediation_for(ErrorCategory::ToolingMissing, &spec.program),
                );
            }
            Err(e) => {
                warn!("failed to start `{}`: {e}", spec.display());
                return OperationResult::failed(
                    ErrorCategory::Unknown,
                    EXIT_CODE_NONE,
                    String::new(),
                    format!("failed to start `{}`: {e}", spec.display()),
                );
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let finished = {
            let collect = async {
                let (_, _, status) = tokio::join!(
                    drain_stream(stdout, lines.clone(), &mut stdout_buf),
                    drain_stream(stderr, lines.clone(), &mut stderr_buf),
                    child.wait(),
                );
                status
            };

            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
                None => Some(collect.await),
            }
        };

        let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_buf).into_owned();

        match finished {
            Some(Ok(status)) => {
                let exit_code = status.code().unwrap_or(EXIT_CODE_NONE);
                debug!("`{}` exited with {exit_code}", spec.display());
                OperationResult {
                    success: status.success(),
                    exit_code,
                    stdout,
                    stderr,
                    error_category: None,
                }
            }
            Some(Err(e)) => {
                warn!("failed waiting for `{}`: {e}", spec.display());
                let stderr = if stderr.is_empty() { e.to_string() } else { stderr };
                OperationResult::failed(ErrorCategory::Unknown, EXIT_CODE_NONE, stdout, stderr)
            }
            None => {
                let limit = self.timeout.unwrap_or_default();
                warn!("`{}` timed out after {limit:?}, terminating", spec.display());
                if let Err(e) = child.kill().await {
                    warn!("failed to terminate `{}`: {e}", spec.display());
                }
                let remediation =
                    remediation_for(ErrorCategory::TimedOut, &format!("{limit:?}"));
                let stderr = if stderr.trim().is_empty() {
                    remediation
                } else {
                    format!("{remediation}\n{}", stderr.trim_end())
                };
                OperationResult::failed(ErrorCategory::TimedOut, EXIT_CODE_NONE, stdout, stderr)
            }
        }
    }
}

/// Reads a pipe to its end into `captured`, forwarding complete lines as they appear
///
/// Bytes land in `captured` as soon as they are read, so a caller that stops
/// waiting early still keeps everything read so far.
async fn drain_stream<R>(reader: Option<R>, lines: Option<LineSender>, captured: &mut Vec<u8>)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };

    let mut pending = Vec::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];

    loop {
        let read = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("error reading child output: {e}");
                break;
            }
        };
        let chunk = &buf[..read];
        captured.extend_from_slice(chunk);

        if let Some(tx) = &lines {
            for &byte in chunk {
                if byte == b'\n' || byte == b'\r' {
                    forward_line(tx, &mut pending);
                } else {
                    pending.push(byte);
                }
            }
        }
    }

    if let Some(tx) = &lines {
        forward_line(tx, &mut pending);
    }
}

fn forward_line(tx: &LineSender, pending: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }
    // Receiver may already be gone; output is still captured
    let _ = tx.send(String::from_utf8_lossy(pending).into_owned());
    pending.clear();
}
