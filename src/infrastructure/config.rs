//! Run options

use super::docker::DEFAULT_BUILDER;
use crate::build::OutputMode;

/// Options that control one orchestration run
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunOptions {
    /// Run the build step (false for push-only runs)
    pub do_build: bool,
    /// Run the push step after a successful build
    pub do_push: bool,
    /// Let the builder print progress; when off the builder gets `-q`
    pub verbose: bool,
    /// Maximum number of tasks in flight
    pub concurrency: usize,
    /// Image builder program
    pub builder: String,
    /// Output handling for builder processes
    pub output_mode: OutputMode,
}

impl RunOptions {
    /// Concurrency actually used; zero counts as one
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Sets the concurrency from a signed value; zero or negative becomes one
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: i64) -> Self {
        self.concurrency = usize::try_from(parallelism).unwrap_or(0).max(1);
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            do_build: true,
            do_push: false,
            verbose: true,
            concurrency: 1,
            builder: DEFAULT_BUILDER.to_string(),
            output_mode: OutputMode::Inherit,
        }
    }
}
