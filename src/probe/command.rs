//! Running external tools with a hard deadline

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::ProbeError;

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Output captured from a finished tool
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status (always success)
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

/// One invocation of an external tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append a single argument
    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Name used in errors and logs
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run to completion, killing the child if the deadline passes.
    ///
    /// The deadline also bounds reading the pipes: a child that exits while
    /// a descendant keeps its stdout open still times out.
    ///
    /// A spawn failure or unsuccessful exit is `ToolFailed`; an expired
    /// deadline is `Timeout`.
    pub fn execute(&self) -> Result<ToolOutput, ProbeError> {
        let tool = self.tool_name();
        log::debug!("Running {} {:?}", tool, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProbeError::ToolFailed {
                tool: tool.clone(),
                message: format!("failed to spawn: {}", e),
            })?;

        // Drain both pipes off-thread so a chatty child never blocks on a full pipe
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_rx = drain_in_background(stdout);
        let stderr_rx = drain_in_background(stderr);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    log::debug!("{} killed after {:?}", tool, self.timeout);
                    return Err(ProbeError::Timeout {
                        tool,
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::ToolFailed {
                        tool,
                        message: format!("error waiting for process: {}", e),
                    });
                }
            }
        };

        let (Some(stdout), Some(stderr)) = (
            collect(&stdout_rx, deadline),
            collect(&stderr_rx, deadline),
        ) else {
            log::debug!("{} left its output pipes open past {:?}", tool, self.timeout);
            return Err(ProbeError::Timeout {
                tool,
                timeout: self.timeout,
            });
        };
        let output = ToolOutput {
            status,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
        };

        if !output.status.success() {
            return Err(ProbeError::exit_status(&tool, output.status, &output.stderr));
        }

        Ok(output)
    }
}

fn drain_in_background<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(drain(pipe));
    });
    rx
}

/// Wait for a drained pipe until the deadline; `None` once it has passed
fn collect(rx: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(buf) => Some(buf),
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
        Err(RecvTimeoutError::Timeout) => None,
    }
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
