//! Subprocess execution with a deadline.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use conform_core::errors::ToolExecutionError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured result of a finished tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Run `program` with `args`, killing it once `timeout` elapses.
///
/// Output pipes are drained on reader threads so a chatty tool cannot
/// block on a full pipe while we wait for it. The deadline also covers
/// draining: a tool that exits but leaves a background process holding
/// its pipes open times out instead of blocking the run.
pub fn run_tool(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput, ToolExecutionError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolExecutionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let (tx, rx) = mpsc::channel();
    let mut pending = 0;
    if let Some(pipe) = child.stdout.take() {
        drain(pipe, Stream::Stdout, tx.clone());
        pending += 1;
    }
    if let Some(pipe) = child.stderr.take() {
        drain(pipe, Stream::Stderr, tx.clone());
        pending += 1;
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    kill(&mut child, program);
                    return Err(ToolExecutionError::Timeout {
                        program: program.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                kill(&mut child, program);
                return Err(ToolExecutionError::Io {
                    program: program.to_string(),
                    source,
                });
            }
        }
    };

    let mut output = ToolOutput {
        code: status.code(),
        stdout: String::new(),
        stderr: String::new(),
    };
    if !collect(&rx, pending, deadline, &mut output) {
        tracing::debug!(program, "tool exited but its output pipes stayed open");
        return Err(ToolExecutionError::Timeout {
            program: program.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        });
    }
    Ok(output)
}

/// First line of `program --version`, or `None` if the tool is missing
/// or silent.
pub fn tool_version(program: &str, timeout: Duration) -> Option<String> {
    let output = run_tool(program, &["--version".to_string()], timeout).ok()?;
    output
        .stdout
        .lines()
        .chain(output.stderr.lines())
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn drain<R: Read + Send + 'static>(mut pipe: R, stream: Stream, tx: Sender<(Stream, Vec<u8>)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
}

/// Wait for `pending` pipes to reach EOF; `false` once `deadline` passes.
fn collect(
    rx: &Receiver<(Stream, Vec<u8>)>,
    mut pending: usize,
    deadline: Instant,
    output: &mut ToolOutput,
) -> bool {
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((stream, bytes)) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                match stream {
                    Stream::Stdout => output.stdout = text,
                    Stream::Stderr => output.stderr = text,
                }
                pending -= 1;
            }
            Err(RecvTimeoutError::Timeout) => return false,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    true
}

fn kill(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        tracing::debug!(program, error = %e, "failed to kill tool");
    }
    let _ = child.wait();
}
