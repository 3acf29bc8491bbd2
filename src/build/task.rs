//! Build task definition
//!
//! A [`BuildTask`] is one unit of work for the runner: an image reference,
//! the build arguments that produce it and where the builder runs from.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a child process's output reaches the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The child writes straight to the parent's stdout/stderr
    #[default]
    Inherit,
    /// Output is read line by line and re-emitted by the executor
    Capture,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inherit => write!(f, "inherit"),
            Self::Capture => write!(f, "capture"),
        }
    }
}

/// One image to build (and optionally push)
///
/// Fields are only reachable through accessors; a task never changes after
/// the expander creates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTask {
    image: String,
    build_args: Vec<String>,
    working_directory: PathBuf,
    output_mode: OutputMode,
}

impl BuildTask {
    /// Creates a new task
    #[must_use]
    pub fn new(
        image: impl Into<String>,
        build_args: Vec<String>,
        working_directory: impl Into<PathBuf>,
        output_mode: OutputMode,
    ) -> Self {
        Self {
            image: image.into(),
            build_args,
            working_directory: working_directory.into(),
            output_mode,
        }
    }

    /// Fully qualified image reference (`name:tag`)
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// `KEY=VALUE` build arguments in the order they are passed
    #[must_use]
    pub fn build_args(&self) -> &[String] {
        &self.build_args
    }

    /// Directory the builder is started from
    #[must_use]
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Output handling for this task's child processes
    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }
}

impl fmt::Display for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let task = BuildTask::new(
            "acme/tool:1.0",
            vec!["REPO_TAG=1.0".to_string()],
            "/repos/tool",
            OutputMode::Capture,
        );

        assert_eq!(task.image(), "acme/tool:1.0");
        assert_eq!(task.build_args(), ["REPO_TAG=1.0"]);
        assert_eq!(task.working_directory(), Path::new("/repos/tool"));
        assert_eq!(task.output_mode(), OutputMode::Capture);
        assert_eq!(task.to_string(), "acme/tool:1.0");
    }

    #[test]
    fn test_serializes_for_plan_dump() {
        let task = BuildTask::new("acme/tool:1.0", vec![], "/repos/tool", OutputMode::Inherit);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["image"], "acme/tool:1.0");
        assert_eq!(json["output_mode"], "inherit");
        assert_eq!(json["working_directory"], "/repos/tool");
    }

    #[test]
    fn test_output_mode_default_is_inherit() {
        assert_eq!(OutputMode::default(), OutputMode::Inherit);
    }
}
