//! Prelude module for common imports

pub use crate::build::{
    BuildStep, BuildTask, ConfigError, Configuration, DEFAULT_CONFIG_FILE, ExpandOptions,
    Installer, OutputMode, RepositoryLocation, TaskState, Validate, ValidationError, expand,
};
pub use crate::executor::{
    ConsoleSink, Invocation, LocalExecutor, OutputSink, ProcessError, ProcessExecutor, RunError,
    RunSummary, TaskRunner,
};
pub use crate::infrastructure::{ImageBuilder, RunOptions};
