//! Error types for the build configuration

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating and loading a build configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The repository directory does not exist
    #[error("repository path does not exist: {}", .0.display())]
    RepositoryNotFound(PathBuf),

    /// The configuration file does not exist inside the repository
    #[error("configuration file does not exist: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// The configuration file could not be read
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error message.
        reason: String,
    },

    /// The configuration file is not valid JSON/YAML for the expected shape
    #[error("failed to parse {}: {reason}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error message.
        reason: String,
    },

    /// The configuration parsed but is not usable
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// Validation errors for a parsed build configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `image_name` is empty
    #[error("image_name cannot be empty")]
    EmptyImageName,

    /// `image_version` is empty
    #[error("image_version cannot be empty")]
    EmptyImageVersion,

    /// `base_versions` has no entries
    #[error("base_versions must contain at least one version")]
    NoBaseVersions,

    /// An installer has an empty `version`
    #[error("installer #{index} has an empty version")]
    EmptyInstallerVersion {
        /// Zero-based position of the installer.
        index: usize,
    },
}
