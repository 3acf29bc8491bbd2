//! Expansion of a build configuration into build tasks
//!
//! Every base version yields one task per installer variant, or a single
//! task when no installers are declared. Output order follows
//! `base_versions` first and installers second, which is also the order the
//! runner admits tasks in.

use super::config::{Configuration, Installer};
use super::task::{BuildTask, OutputMode};
use std::path::PathBuf;

/// Settings shared by every task produced from one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Resolved repository path; the builder runs from here
    pub working_directory: PathBuf,
    /// Output handling for the builder's child processes
    pub output_mode: OutputMode,
}

impl ExpandOptions {
    /// Creates options for `working_directory` with inherited output
    #[must_use]
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            output_mode: OutputMode::Inherit,
        }
    }

    /// Sets the output mode
    #[must_use]
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }
}

/// Expands `config` into the ordered list of tasks to run
///
/// An empty `base_versions` yields an empty list; deciding whether that is
/// a misconfiguration is up to the caller.
#[must_use]
pub fn expand(config: &Configuration, options: &ExpandOptions) -> Vec<BuildTask> {
    let installers = config.installers();
    let mut tasks = Vec::with_capacity(config.base_versions.len() * installers.len().max(1));

    for base_version in &config.base_versions {
        if installers.is_empty() {
            tasks.push(plain_task(config, base_version, options));
            continue;
        }

        let version = derived_version(&config.image_version, base_version);
        for installer in installers {
            tasks.push(installer_task(config, base_version, &version, installer, options));
        }
    }

    tracing::debug!(
        image = %config.image_name,
        base_versions = config.base_versions.len(),
        installers = installers.len(),
        tasks = tasks.len(),
        "Expanded build configuration"
    );

    tasks
}

/// Image version for an installer-specific tag
///
/// The base version's suffix from its first hyphen onward is appended to
/// `image_version`: `("3.2", "bookworm-slim")` gives `"3.2-slim"`, while a
/// base version without a hyphen leaves `image_version` unchanged.
#[must_use]
pub fn derived_version(image_version: &str, base_version: &str) -> String {
    match base_version.find('-') {
        Some(idx) => format!("{image_version}{}", &base_version[idx..]),
        None => image_version.to_string(),
    }
}

fn plain_task(config: &Configuration, base_version: &str, options: &ExpandOptions) -> BuildTask {
    BuildTask::new(
        format!("{}:{}", config.image_name, config.image_version),
        vec![
            format!("REPO_TAG={}", config.image_version),
            format!("BASE_VERSION={base_version}"),
        ],
        options.working_directory.clone(),
        options.output_mode,
    )
}

fn installer_task(
    config: &Configuration,
    base_version: &str,
    version: &str,
    installer: &Installer,
    options: &ExpandOptions,
) -> BuildTask {
    BuildTask::new(
        format!("{}:{version}-{}", config.image_name, installer.version),
        vec![
            format!("REPO_TAG={}", config.image_version),
            format!("BASE_VERSION={base_version}"),
            format!("URL={}", installer.url),
            format!("FILENAME={}", installer.filename),
        ],
        options.working_directory.clone(),
        options.output_mode,
    )
}
