//! # Imagesmith - container image build orchestration
//!
//! Imagesmith turns a declarative build configuration into a set of
//! container image builds (and optional pushes) and runs them with bounded
//! parallelism through a docker-compatible CLI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imagesmith::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let location = RepositoryLocation::resolve(
//!     std::path::Path::new("/srv/images"),
//!     "toolbox",
//!     DEFAULT_CONFIG_FILE,
//! )?;
//! let config = location.load()?;
//! let tasks = expand(&config, &ExpandOptions::new(&location.repository_path));
//!
//! let options = RunOptions {
//!     do_push: true,
//!     concurrency: 4,
//!     ..RunOptions::default()
//! };
//! TaskRunner::new(LocalExecutor::new(), options).run(&tasks).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`build`]: configuration, validation and expansion into [`BuildTask`]s
//! - [`executor`]: process execution and the bounded-concurrency runner
//! - [`infrastructure`]: builder command lines, run options and logging
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <https://www.apache.org/licenses/LICENSE-2.0>)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or <https://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod build;
pub mod executor;
pub mod infrastructure;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use build::{
    BuildStep, BuildTask, ConfigError, Configuration, ExpandOptions, Installer, OutputMode,
    RepositoryLocation, TaskState, Validate, ValidationError, expand,
};
pub use executor::{
    Invocation, LocalExecutor, OutputSink, ProcessError, ProcessExecutor, RunError, RunSummary,
    TaskRunner,
};
pub use infrastructure::{ImageBuilder, RunOptions, init_logging};

/// Version of the imagesmith crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
