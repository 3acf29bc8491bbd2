//! Build domain types and logic

pub mod config;
pub mod errors;
pub mod expand;
pub mod task;
pub mod types;

pub use config::{Configuration, DEFAULT_CONFIG_FILE, Installer, RepositoryLocation};
pub use errors::{ConfigError, ValidationError};
pub use expand::{ExpandOptions, derived_version, expand};
pub use task::{BuildTask, OutputMode};
pub use types::{BuildStep, TaskState, Validate};
