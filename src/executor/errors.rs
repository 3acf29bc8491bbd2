//! Error types for process execution and task runs

use crate::build::BuildStep;
use thiserror::Error;

/// Errors from running a single external process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The program could not be launched (not found, permission denied, ...)
    #[error("failed to launch '{program}': {reason}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Error message from the OS.
        reason: String,
    },

    /// The program ran and exited with a non-zero code
    #[error("'{program}' exited with code {code}")]
    ExitFailure {
        /// Program that failed.
        program: String,
        /// Exit code returned by the program.
        code: i32,
    },

    /// The program was terminated by a signal and has no exit code
    #[error("'{program}' was terminated by signal {signal}")]
    Signal {
        /// Program that was terminated.
        program: String,
        /// Signal number.
        signal: i32,
    },

    /// Waiting on the child or reading its output failed after it started
    #[error("I/O error while running '{program}': {reason}")]
    Io {
        /// Program being waited on.
        program: String,
        /// Error message.
        reason: String,
    },
}

impl ProcessError {
    /// Exit code carried by an [`ProcessError::ExitFailure`]
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitFailure { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Failure of a whole run; carries the first task failure observed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A build or push step failed
    #[error("{step} of {image} failed: {source}")]
    TaskFailed {
        /// Image reference of the failing task.
        image: String,
        /// Step that failed.
        step: BuildStep,
        /// Process failure.
        #[source]
        source: ProcessError,
    },
}

impl RunError {
    /// Image reference of the failing task
    #[must_use]
    pub fn image(&self) -> &str {
        match self {
            Self::TaskFailed { image, .. } => image,
        }
    }

    /// Underlying process failure
    #[must_use]
    pub fn process_error(&self) -> &ProcessError {
        match self {
            Self::TaskFailed { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_failure_message_names_code() {
        let err = ProcessError::ExitFailure {
            program: "docker".to_string(),
            code: 125,
        };
        assert_eq!(err.to_string(), "'docker' exited with code 125");
        assert_eq!(err.exit_code(), Some(125));
    }

    #[test]
    fn test_signal_has_no_exit_code() {
        let err = ProcessError::Signal {
            program: "docker".to_string(),
            signal: 9,
        };
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_run_error_message() {
        let err = RunError::TaskFailed {
            image: "acme/toolbox:3.2".to_string(),
            step: BuildStep::Push,
            source: ProcessError::ExitFailure {
                program: "docker".to_string(),
                code: 1,
            },
        };
        assert_eq!(
            err.to_string(),
            "push of acme/toolbox:3.2 failed: 'docker' exited with code 1"
        );
        assert_eq!(err.image(), "acme/toolbox:3.2");
        assert_eq!(err.process_error().exit_code(), Some(1));
    }
}
