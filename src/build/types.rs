//! Core types for the build domain
//!
//! Steps and lifecycle states that a build task moves through while the
//! runner executes it.

#![allow(clippy::must_use_candidate)]

use std::fmt;

/// One step of a task's build-then-push pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStep {
    /// `<builder> build ...`
    Build,
    /// `<builder> push <image>`
    Push,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Push => write!(f, "push"),
        }
    }
}

/// Lifecycle of a single task inside a run
///
/// `Pending -> Building -> (Pushing | Done) -> Done`, with `Failed`
/// reachable from `Building` and `Pushing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not admitted yet
    Pending,
    /// Build step running
    Building,
    /// Push step running
    Pushing,
    /// Pipeline finished successfully
    Done,
    /// A step failed
    Failed,
}

impl TaskState {
    /// Returns true for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The state a task is in while running `step`
    pub fn running(step: BuildStep) -> Self {
        match step {
            BuildStep::Build => Self::Building,
            BuildStep::Push => Self::Pushing,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Building => write!(f, "BUILDING"),
            Self::Pushing => write!(f, "PUSHING"),
            Self::Done => write!(f, "DONE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Trait for types that can be validated
#[allow(clippy::missing_errors_doc)]
pub trait Validate {
    /// Type of validation error
    type Error;

    /// Validates this type
    fn validate(&self) -> std::result::Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_state_terminal() {
        assert!(TaskState::Done.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Building.is_terminal());
        assert!(!TaskState::Pushing.is_terminal());
    }

    #[test]
    fn test_running_state_for_step() {
        assert_eq!(TaskState::running(BuildStep::Build), TaskState::Building);
        assert_eq!(TaskState::running(BuildStep::Push), TaskState::Pushing);
    }

    #[test]
    fn test_display() {
        assert_eq!(BuildStep::Build.to_string(), "build");
        assert_eq!(BuildStep::Push.to_string(), "push");
        assert_eq!(TaskState::Building.to_string(), "BUILDING");
    }
}
