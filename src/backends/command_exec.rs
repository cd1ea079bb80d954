use crate::config::settings::{DEFAULT_MAX_OUTPUT, DEFAULT_TIMEOUT_SECS, Settings};
use crate::error::{PkmanError, Result};
use crate::ui;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bounds applied to every external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecLimits {
    pub timeout: Duration,
    /// Maximum bytes kept per stream; the rest is read and discarded.
    pub max_output: usize,
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_output: DEFAULT_MAX_OUTPUT,
        }
    }
}

impl From<&Settings> for ExecLimits {
    fn from(settings: &Settings) -> Self {
        Self {
            timeout: settings.timeout,
            max_output: settings.max_output,
        }
    }
}

#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
}

impl CommandOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

type Captured = (Vec<u8>, bool);

/// Read up to `limit` bytes, then discard the rest. The flag is set when
/// anything was discarded.
fn drain<R: Read>(reader: R, limit: usize) -> io::Result<Captured> {
    let mut buf = Vec::new();
    let mut limited = reader.take(limit as u64);
    limited.read_to_end(&mut buf)?;
    // Keep draining so the child never blocks on a full pipe.
    let mut rest = limited.into_inner();
    let discarded = io::copy(&mut rest, &mut io::sink())?;
    Ok((buf, discarded > 0))
}

fn capture<R>(reader: R, limit: usize, stream: Stream, tx: Sender<(Stream, io::Result<Captured>)>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        // The receiver is gone once the command has been abandoned.
        let _ = tx.send((stream, drain(reader, limit)));
    });
}

fn stopped(command: String, limits: ExecLimits, timed_out: bool) -> PkmanError {
    if timed_out {
        PkmanError::CommandTimedOut {
            command,
            seconds: limits.timeout.as_secs(),
        }
    } else {
        PkmanError::Interrupted
    }
}

/// Wait for both reader threads, within what is left of the timeout.
///
/// Background processes started by the command can hold the pipes open after
/// the command itself exits. They are left running when the wait is abandoned.
fn collect(
    rx: &Receiver<(Stream, io::Result<Captured>)>,
    start: Instant,
    limits: ExecLimits,
    cmd_debug: &str,
) -> Result<(Captured, Captured)> {
    let (mut stdout, mut stderr) = (None, None);
    loop {
        (stdout, stderr) = match (stdout, stderr) {
            (Some(out), Some(err)) => return Ok((out, err)),
            pending => pending,
        };

        let remaining = limits.timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() || ui::is_interrupted() {
            return Err(stopped(cmd_debug.to_string(), limits, remaining.is_zero()));
        }

        match rx.recv_timeout(remaining.min(POLL_INTERVAL)) {
            Ok((stream, captured)) => {
                let captured = captured.map_err(|e| PkmanError::SystemCommandFailed {
                    command: cmd_debug.to_string(),
                    reason: format!("Failed to read {}: {}", stream.name(), e),
                })?;
                match stream {
                    Stream::Stdout => stdout = Some(captured),
                    Stream::Stderr => stderr = Some(captured),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(PkmanError::SystemCommandFailed {
                    command: cmd_debug.to_string(),
                    reason: "Output reader stopped unexpectedly".to_string(),
                });
            }
        }
    }
}

/// Execute a command non-interactively, capturing both streams.
///
/// A nonzero exit status is not an error here; callers decide. Spawn failures,
/// read errors, timeouts and Ctrl-C are. The timeout covers the whole call,
/// including reading output after the process exits.
pub fn run_command(cmd: &mut Command, limits: ExecLimits) -> Result<CommandOutput> {
    let cmd_debug = format!("{:?}", cmd);

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| PkmanError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: e.to_string(),
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| PkmanError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stdout".to_string(),
        })?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| PkmanError::SystemCommandFailed {
            command: cmd_debug.clone(),
            reason: "Failed to capture stderr".to_string(),
        })?;

    let (tx, rx) = mpsc::channel();
    capture(stdout, limits.max_output, Stream::Stdout, tx.clone());
    capture(stderr, limits.max_output, Stream::Stderr, tx);

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                let timed_out = start.elapsed() > limits.timeout;
                if timed_out || ui::is_interrupted() {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(stopped(cmd_debug, limits, timed_out));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(PkmanError::SystemCommandFailed {
                    command: cmd_debug,
                    reason: e.to_string(),
                });
            }
        }
    };

    let ((stdout, stdout_truncated), (stderr, stderr_truncated)) =
        collect(&rx, start, limits, &cmd_debug)?;

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[test]
    fn captures_both_streams() {
        let out = run_command(&mut sh("echo out; echo err >&2"), ExecLimits::default())
            .expect("run");
        assert!(out.status.success());
        assert_eq!(out.stdout_lossy(), "out\n");
        assert_eq!(out.stderr_lossy(), "err\n");
        assert!(!out.stdout_truncated);
    }

    #[test]
    fn nonzero_exit_is_returned_not_raised() {
        let out = run_command(&mut sh("echo partial; exit 3"), ExecLimits::default())
            .expect("run");
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(out.stdout_lossy(), "partial\n");
    }

    #[test]
    fn missing_binary_is_an_error() {
        let mut cmd = Command::new("/nonexistent/pkman-test-binary");
        let err = run_command(&mut cmd, ExecLimits::default()).unwrap_err();
        assert!(matches!(err, PkmanError::SystemCommandFailed { .. }));
    }

    #[test]
    fn timeout_kills_the_child() {
        let limits = ExecLimits {
            timeout: Duration::from_millis(200),
            ..ExecLimits::default()
        };
        let started = Instant::now();
        let err = run_command(&mut sh("exec sleep 10"), limits).unwrap_err();
        assert!(matches!(err, PkmanError::CommandTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn background_process_holding_pipes_does_not_outlive_timeout() {
        let limits = ExecLimits {
            timeout: Duration::from_millis(300),
            ..ExecLimits::default()
        };
        let started = Instant::now();
        let err = run_command(&mut sh("sleep 4 & echo hi"), limits).unwrap_err();
        assert!(matches!(err, PkmanError::CommandTimedOut { .. }), "{err}");
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    }

    #[test]
    fn background_process_with_closed_pipes_is_not_waited_for() {
        let started = Instant::now();
        let out = run_command(
            &mut sh("sleep 4 >/dev/null 2>&1 & echo hi"),
            ExecLimits::default(),
        )
        .expect("run");
        assert_eq!(out.stdout_lossy(), "hi\n");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    struct BrokenPipe {
        sent: bool,
    }

    impl Read for BrokenPipe {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::other("pipe broke"));
            }
            self.sent = true;
            let n = buf.len().min(4);
            buf[..n].copy_from_slice(&b"bbdb"[..n]);
            Ok(n)
        }
    }

    #[test]
    fn read_error_is_not_a_short_capture() {
        let err = drain(BrokenPipe { sent: false }, 1000).unwrap_err();
        assert_eq!(err.to_string(), "pipe broke");
    }

    #[test]
    fn read_error_surfaces_as_command_failure() {
        let (tx, rx) = mpsc::channel();
        capture(BrokenPipe { sent: false }, 1000, Stream::Stdout, tx.clone());
        capture(io::empty(), 1000, Stream::Stderr, tx);

        let err = collect(&rx, Instant::now(), ExecLimits::default(), "fake").unwrap_err();
        match err {
            PkmanError::SystemCommandFailed { command, reason } => {
                assert_eq!(command, "fake");
                assert!(reason.contains("stdout"), "{reason}");
                assert!(reason.contains("pipe broke"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn drain_flags_truncation() {
        let (buf, truncated) = drain(&b"0123456789"[..], 4).expect("drain");
        assert_eq!(buf, b"0123");
        assert!(truncated);
        let (buf, truncated) = drain(&b"0123"[..], 4).expect("drain");
        assert_eq!(buf, b"0123");
        assert!(!truncated);
    }

    #[test]
    fn output_is_bounded() {
        let limits = ExecLimits {
            max_output: 1000,
            ..ExecLimits::default()
        };
        let out = run_command(
            &mut sh("i=0; while [ $i -lt 500 ]; do echo 0123456789; i=$((i+1)); done"),
            limits,
        )
        .expect("run");
        assert_eq!(out.stdout.len(), 1000);
        assert!(out.stdout_truncated);
        assert!(out.status.success());
    }
}
