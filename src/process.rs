use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of one external process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `program` with `args` and capture its output.
///
/// A non-zero exit status is not an error here; callers inspect
/// [`Invocation::success`] and pick their own error. Without a `timeout`
/// this blocks until the child exits.
pub fn run(program: &OsStr, args: &[OsString], timeout: Option<Duration>) -> Result<Invocation> {
    let name = program.to_string_lossy().to_string();
    debug!("Running: {} {}", name, render_args(args));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: name.clone(),
            source,
        })?;

    // Drain both pipes concurrently so a chatty stderr cannot block the child.
    let stdout_reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    });

    let status = match timeout {
        None => child.wait(),
        Some(limit) => {
            let start = Instant::now();
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => break Ok(status),
                    Ok(None) if start.elapsed() > limit => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(Error::Timeout {
                            program: name.clone(),
                            secs: limit.as_secs(),
                        });
                    }
                    Ok(None) => thread::sleep(POLL_INTERVAL),
                    Err(e) => break Err(e),
                }
            }
        }
    }
    .map_err(|source| Error::Spawn {
        program: name.clone(),
        source,
    })?;

    let stdout = stdout_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    debug!("{} exited with {:?}", name, status.code());

    Ok(Invocation {
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Space-joined argument list for log lines.
fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["-c".into(), script.into()]
    }

    #[test]
    fn test_captures_both_streams() {
        let inv = run(OsStr::new("sh"), &sh("echo out; echo err >&2"), None).unwrap();
        assert!(inv.success());
        assert_eq!(inv.stdout, "out\n");
        assert_eq!(inv.stderr, "err\n");
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let inv = run(OsStr::new("sh"), &sh("echo boom >&2; exit 3"), None).unwrap();
        assert!(!inv.success());
        assert_eq!(inv.exit_code, Some(3));
        assert_eq!(inv.stderr, "boom\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = run(OsStr::new("/nonexistent/loudclean-tool"), &[], None).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let err = run(
            OsStr::new("sh"),
            &sh("sleep 5"),
            Some(Duration::from_millis(100)),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_large_stderr_does_not_deadlock() {
        let inv = run(
            OsStr::new("sh"),
            &sh("i=0; while [ $i -lt 20000 ]; do echo 0123456789abcdef >&2; i=$((i+1)); done"),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert!(inv.success());
        assert_eq!(inv.stderr.lines().count(), 20000);
    }
}
