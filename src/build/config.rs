//! Build configuration document
//!
//! The configuration lives inside the image repository (by default
//! `build-config.json`) and names the image plus the base versions and
//! installer variants to build it for:
//!
//! ```json
//! {
//!   "image_name": "acme/toolbox",
//!   "image_version": "3.2",
//!   "base_versions": ["bookworm", "bookworm-slim"],
//!   "installers": [
//!     { "version": "17", "url": "https://example.com/jdk17.tgz", "filename": "jdk17.tgz" }
//!   ]
//! }
//! ```
//!
//! Files ending in `.yaml` or `.yml` are read as YAML with the same keys.

use super::errors::{ConfigError, ValidationError};
use super::types::Validate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file inside a repository
pub const DEFAULT_CONFIG_FILE: &str = "build-config.json";

/// One installer variant; each produces its own tag per base version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installer {
    /// Suffix appended to the tag
    pub version: String,
    /// Download location passed as `URL`
    pub url: String,
    /// File name passed as `FILENAME`
    pub filename: String,
}

/// Parsed build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Image repository name, e.g. `acme/toolbox`
    pub image_name: String,
    /// Version used for tags and the `REPO_TAG` build argument
    pub image_version: String,
    /// Base image versions, in build order
    pub base_versions: Vec<String>,
    /// Optional installer variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installers: Option<Vec<Installer>>,
}

impl Configuration {
    /// Installer variants, empty when none are declared
    #[must_use]
    pub fn installers(&self) -> &[Installer] {
        self.installers.as_deref().unwrap_or_default()
    }

    /// Parses a configuration from JSON text
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON or missing fields.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Parses a configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed YAML or missing fields.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads and parses a configuration file, choosing the format from its extension
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its content is not a valid configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let parsed = if is_yaml {
            Self::from_yaml(&content).map_err(|e| e.to_string())
        } else {
            Self::from_json(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }
}

impl Validate for Configuration {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.image_name.trim().is_empty() {
            return Err(ValidationError::EmptyImageName);
        }
        if self.image_version.trim().is_empty() {
            return Err(ValidationError::EmptyImageVersion);
        }
        if self.base_versions.is_empty() {
            return Err(ValidationError::NoBaseVersions);
        }
        if let Some(index) = self
            .installers()
            .iter()
            .position(|installer| installer.version.is_empty())
        {
            return Err(ValidationError::EmptyInstallerVersion { index });
        }
        Ok(())
    }
}

/// Where a repository and its configuration file live on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    /// Directory the builder runs from
    pub repository_path: PathBuf,
    /// Full path of the configuration file
    pub config_path: PathBuf,
}

impl RepositoryLocation {
    /// Resolves `<repositories_dir>/<repository>/<config_file>` and checks both exist
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RepositoryNotFound`] when the repository is not a
    /// directory and [`ConfigError::ConfigFileNotFound`] when the configuration
    /// file is missing.
    pub fn resolve(
        repositories_dir: &Path,
        repository: &str,
        config_file: &str,
    ) -> Result<Self, ConfigError> {
        let repository_path = repositories_dir.join(repository);
        let config_path = repository_path.join(config_file);

        if !repository_path.is_dir() {
            return Err(ConfigError::RepositoryNotFound(repository_path));
        }
        if !config_path.is_file() {
            return Err(ConfigError::ConfigFileNotFound(config_path));
        }

        Ok(Self {
            repository_path,
            config_path,
        })
    }

    /// Loads and validates the configuration file
    ///
    /// # Errors
    ///
    /// Returns the read or parse error from [`Configuration::from_file`], or
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        tracing::debug!(path = %self.config_path.display(), "Loading build configuration");

        let config = Configuration::from_file(&self.config_path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const SAMPLE_JSON: &str = r#"{
        "image_name": "acme/toolbox",
        "image_version": "3.2",
        "base_versions": ["bookworm", "bookworm-slim"],
        "installers": [
            { "version": "17", "url": "https://example.com/jdk17.tgz", "filename": "jdk17.tgz" }
        ]
    }"#;

    fn minimal() -> Configuration {
        Configuration {
            image_name: "acme/toolbox".to_string(),
            image_version: "3.2".to_string(),
            base_versions: vec!["bookworm".to_string()],
            installers: None,
        }
    }

    #[test]
    fn test_parse_json() {
        let config = Configuration::from_json(SAMPLE_JSON).unwrap();

        assert_eq!(config.image_name, "acme/toolbox");
        assert_eq!(config.base_versions, vec!["bookworm", "bookworm-slim"]);
        assert_eq!(
            config.installers(),
            [Installer {
                version: "17".to_string(),
                url: "https://example.com/jdk17.tgz".to_string(),
                filename: "jdk17.tgz".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_without_installers() {
        let config = Configuration::from_json(
            r#"{ "image_name": "a", "image_version": "1", "base_versions": ["x"] }"#,
        )
        .unwrap();

        assert!(config.installers.is_none());
        assert!(config.installers().is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "image_name: acme/toolbox\nimage_version: '3.2'\nbase_versions:\n  - bookworm\n";
        let config = Configuration::from_yaml(yaml).unwrap();
        assert_eq!(config, minimal());
    }

    #[test]
    fn test_validate_ok() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_base_versions() {
        let mut config = minimal();
        config.base_versions.clear();
        assert_eq!(config.validate(), Err(ValidationError::NoBaseVersions));
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let mut config = minimal();
        config.image_name = " ".to_string();
        assert_eq!(config.validate(), Err(ValidationError::EmptyImageName));

        let mut config = minimal();
        config.image_version = String::new();
        assert_eq!(config.validate(), Err(ValidationError::EmptyImageVersion));
    }

    #[test]
    fn test_validate_rejects_installer_without_version() {
        let mut config = minimal();
        config.installers = Some(vec![Installer {
            version: String::new(),
            url: "u".to_string(),
            filename: "f".to_string(),
        }]);
        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyInstallerVersion { index: 0 })
        );
    }

    #[test]
    fn test_resolve_missing_repository() {
        let dir = tempdir().unwrap();
        let err = RepositoryLocation::resolve(dir.path(), "missing", DEFAULT_CONFIG_FILE)
            .unwrap_err();
        assert_eq!(err, ConfigError::RepositoryNotFound(dir.path().join("missing")));
    }

    #[test]
    fn test_resolve_missing_config_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("toolbox")).unwrap();

        let err = RepositoryLocation::resolve(dir.path(), "toolbox", DEFAULT_CONFIG_FILE)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConfigFileNotFound(dir.path().join("toolbox").join(DEFAULT_CONFIG_FILE))
        );
    }

    #[test]
    fn test_resolve_and_load() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("toolbox");
        fs::create_dir(&repo).unwrap();
        fs::write(repo.join(DEFAULT_CONFIG_FILE), SAMPLE_JSON).unwrap();

        let location = RepositoryLocation::resolve(dir.path(), "toolbox", DEFAULT_CONFIG_FILE)
            .unwrap();
        assert_eq!(location.repository_path, repo);

        let config = location.load().unwrap();
        assert_eq!(config.image_version, "3.2");
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("toolbox");
        fs::create_dir(&repo).unwrap();
        fs::write(repo.join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

        let location = RepositoryLocation::resolve(dir.path(), "toolbox", DEFAULT_CONFIG_FILE)
            .unwrap();
        assert!(matches!(location.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_reports_invalid_config() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("toolbox");
        fs::create_dir(&repo).unwrap();
        fs::write(
            repo.join("build-config.yml"),
            "image_name: a\nimage_version: '1'\nbase_versions: []\n",
        )
        .unwrap();

        let location =
            RepositoryLocation::resolve(dir.path(), "toolbox", "build-config.yml").unwrap();
        assert_eq!(
            location.load(),
            Err(ConfigError::Invalid(ValidationError::NoBaseVersions))
        );
    }
}
