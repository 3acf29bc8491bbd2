//! Image builder command lines
//!
//! Composes the `build` and `push` invocations for a docker-compatible CLI
//! (`docker`, `podman`, ...):
//!
//! ```text
//! <builder> build --compress [-q] -t <image> [--build-arg KEY=VALUE]... .
//! <builder> push <image>
//! ```

use crate::build::BuildTask;
use crate::executor::Invocation;

/// Default image builder program
pub const DEFAULT_BUILDER: &str = "docker";

/// A docker-compatible image builder CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuilder {
    program: String,
}

impl ImageBuilder {
    /// Creates a builder that launches `program`
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build invocation for `task`; `-q` is added only when `verbose` is off
    #[must_use]
    pub fn build_invocation(&self, task: &BuildTask, verbose: bool) -> Invocation {
        let mut args = vec!["build".to_string(), "--compress".to_string()];
        if !verbose {
            args.push("-q".to_string());
        }
        args.push("-t".to_string());
        args.push(task.image().to_string());
        for build_arg in task.build_args() {
            args.push("--build-arg".to_string());
            args.push(build_arg.clone());
        }
        args.push(".".to_string());

        Invocation::new(&self.program, task.working_directory())
            .args(args)
            .with_output_mode(task.output_mode())
    }

    /// Push invocation for `task`
    #[must_use]
    pub fn push_invocation(&self, task: &BuildTask) -> Invocation {
        Invocation::new(&self.program, task.working_directory())
            .args(["push", task.image()])
            .with_output_mode(task.output_mode())
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BUILDER)
    }
}
