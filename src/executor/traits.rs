//! Process execution traits
//!
//! The runner talks to external tools only through [`ProcessExecutor`], and
//! captured output leaves the executor only through [`OutputSink`].

use super::errors::ProcessError;
use crate::build::OutputMode;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to launch
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Directory the program starts in
    pub working_directory: PathBuf,
    /// Output handling
    pub output_mode: OutputMode,
}

impl Invocation {
    /// Creates an invocation running in `working_directory` with inherited output
    #[must_use]
    pub fn new(program: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory: working_directory.into(),
            output_mode: OutputMode::Inherit,
        }
    }

    /// Appends one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the output mode
    #[must_use]
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Shell-quoted command line, for logs and dry runs
    #[must_use]
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Runs one external process to completion
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Launches `invocation` once and resolves when it exits
    ///
    /// Succeeds only for exit code 0.
    async fn execute(&self, invocation: &Invocation) -> Result<(), ProcessError>;
}

/// Destination for lines read from a captured child process
pub trait OutputSink: Send + Sync {
    /// A line from the child's stdout, without its trailing newline
    fn stdout_line(&self, line: &str);

    /// A line from the child's stderr, without its trailing newline
    fn stderr_line(&self, line: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("docker", "/repo")
            .arg("push")
            .args(["acme/toolbox:3.2"])
            .with_output_mode(OutputMode::Capture);

        assert_eq!(inv.program, "docker");
        assert_eq!(inv.args, vec!["push", "acme/toolbox:3.2"]);
        assert_eq!(inv.working_directory, PathBuf::from("/repo"));
        assert_eq!(inv.output_mode, OutputMode::Capture);
    }

    #[test]
    fn test_command_line_quotes_arguments() {
        let inv = Invocation::new("docker", "/repo")
            .args(["build", "--build-arg", "URL=https://example.com/a b.tgz", "."]);

        assert_eq!(
            inv.to_string(),
            "docker build --build-arg 'URL=https://example.com/a b.tgz' ."
        );
    }
}
