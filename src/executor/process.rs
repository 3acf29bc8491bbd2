//! Local process execution
//!
//! [`LocalExecutor`] launches one child process per call with
//! `tokio::process`. In [`OutputMode::Capture`] both pipes are drained line
//! by line while the child runs, and every line is handed to the configured
//! [`OutputSink`] with its line terminator removed. In
//! [`OutputMode::Inherit`] the child shares the parent's console and nothing
//! is read.
//!
//! Every path through [`LocalExecutor::execute`] resolves exactly once: a
//! spawn failure, a failed wait and a failed pipe read are all returned as
//! [`ProcessError`]s.

use super::errors::ProcessError;
use super::sink::ConsoleSink;
use super::traits::{Invocation, OutputSink, ProcessExecutor};
use crate::build::OutputMode;
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::Command;

/// Longest line forwarded in one piece; longer lines are split into chunks
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Executor that runs commands on the host
#[derive(Clone)]
pub struct LocalExecutor {
    sink: Arc<dyn OutputSink>,
}

impl LocalExecutor {
    /// Creates an executor that forwards captured output to the console
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(ConsoleSink),
        }
    }

    /// Sets where captured lines go
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocalExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalExecutor").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProcessExecutor for LocalExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        let program = invocation.program.as_str();

        let mut cmd = Command::new(program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.working_directory)
            .stdin(Stdio::inherit());

        match invocation.output_mode {
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        tracing::debug!(
            command = %invocation,
            cwd = %invocation.working_directory.display(),
            output = %invocation.output_mode,
            "Launching process"
        );

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

        let (status, read_result) = match invocation.output_mode {
            OutputMode::Inherit => (child.wait().await, Ok(())),
            OutputMode::Capture => {
                let stdout = child.stdout.take();
                let stderr = child.stderr.take();
                let sink = self.sink.as_ref();

                let (out, err, status) = tokio::join!(
                    forward_lines(stdout, |line| sink.stdout_line(line)),
                    forward_lines(stderr, |line| sink.stderr_line(line)),
                    child.wait(),
                );
                (status, out.and(err))
            }
        };

        let status = status.map_err(|e| ProcessError::Io {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(
            program = %program,
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "Process exited"
        );

        check_status(program, status)?;

        read_result.map_err(|e| ProcessError::Io {
            program: program.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Reads `reader` to the end, calling `emit` once per line
///
/// `\n` and `\r\n` terminators are stripped; a final line without a
/// terminator is still emitted. Invalid UTF-8 is replaced, not rejected.
/// A line longer than [`MAX_LINE_BYTES`] is emitted in chunks of at most that
/// size, so memory use per stream stays bounded.
async fn forward_lines<R, F>(reader: Option<R>, mut emit: F) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let Some(reader) = reader else {
        return Ok(());
    };

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let mut line = (&mut reader).take(MAX_LINE_BYTES as u64);
        if line.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        emit(&String::from_utf8_lossy(&buf));
    }
}

/// Maps an exit status to success only for code 0
fn check_status(program: &str, status: ExitStatus) -> Result<(), ProcessError> {
    if let Some(code) = status.code() {
        if code == 0 {
            return Ok(());
        }
        return Err(ProcessError::ExitFailure {
            program: program.to_string(),
            code,
        });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(ProcessError::Signal {
                program: program.to_string(),
                signal,
            });
        }
    }

    Err(ProcessError::Io {
        program: program.to_string(),
        reason: format!("process ended without an exit code ({status})"),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::executor::sink::{CollectingSink, Stream};
    use tempfile::tempdir;

    fn sh(script: &str, mode: OutputMode) -> Invocation {
        Invocation::new("sh", std::env::temp_dir())
            .args(["-c", script])
            .with_output_mode(mode)
    }

    fn capturing() -> (LocalExecutor, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let executor = LocalExecutor::new().with_sink(sink.clone());
        (executor, sink)
    }

    #[tokio::test]
    async fn test_capture_strips_trailing_newline() {
        let (executor, sink) = capturing();

        executor
            .execute(&sh("printf 'hello\\n'", OutputMode::Capture))
            .await
            .unwrap();

        assert_eq!(sink.lines(), vec![(Stream::Stdout, "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_capture_routes_stderr() {
        let (executor, sink) = capturing();

        executor
            .execute(&sh("echo out; echo err >&2; echo more", OutputMode::Capture))
            .await
            .unwrap();

        assert_eq!(sink.stream(Stream::Stdout), vec!["out", "more"]);
        assert_eq!(sink.stream(Stream::Stderr), vec!["err"]);
    }

    #[tokio::test]
    async fn test_capture_keeps_unterminated_last_line() {
        let (executor, sink) = capturing();

        executor
            .execute(&sh("printf 'a\\r\\nb'", OutputMode::Capture))
            .await
            .unwrap();

        assert_eq!(sink.stream(Stream::Stdout), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_capture_splits_overlong_line() {
        let (executor, sink) = capturing();
        let total = MAX_LINE_BYTES + 100;
        let script = format!("head -c {total} /dev/zero | tr '\\0' a; echo; echo next");

        executor
            .execute(&sh(&script, OutputMode::Capture))
            .await
            .unwrap();

        let lines = sink.stream(Stream::Stdout);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), MAX_LINE_BYTES);
        assert_eq!(lines[1], "a".repeat(100));
        assert_eq!(lines[2], "next");
    }

    #[tokio::test]
    async fn test_inherit_does_not_touch_sink() {
        let (executor, sink) = capturing();

        executor
            .execute(&sh("true", OutputMode::Inherit))
            .await
            .unwrap();

        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let (executor, _sink) = capturing();

        let err = executor
            .execute(&sh("echo failing >&2; exit 3", OutputMode::Capture))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProcessError::ExitFailure {
                program: "sh".to_string(),
                code: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_signal_is_failure() {
        let (executor, _sink) = capturing();

        let err = executor
            .execute(&sh("kill -9 $$", OutputMode::Inherit))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProcessError::Signal {
                program: "sh".to_string(),
                signal: 9,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let (executor, _sink) = capturing();
        let invocation = Invocation::new("imagesmith-no-such-program", std::env::temp_dir());

        let err = executor.execute(&invocation).await.unwrap_err();

        assert!(matches!(err, ProcessError::Spawn { ref program, .. } if program == "imagesmith-no-such-program"));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let (executor, sink) = capturing();
        let dir = tempdir().unwrap();
        let invocation = Invocation::new("sh", dir.path())
            .args(["-c", "pwd -P"])
            .with_output_mode(OutputMode::Capture);

        executor.execute(&invocation).await.unwrap();

        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            sink.stream(Stream::Stdout),
            vec![expected.to_string_lossy().to_string()]
        );
    }
}
