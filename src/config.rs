//! Configuration loading and validation for testrail-reporter.
//!
//! Configuration is read from TOML ([`load_config`], [`load_config_str`])
//! and then validated eagerly with [`Config::validate`], before any test
//! result is recorded. Validation either fails with a [`ConfigError`]
//! naming the first missing mandatory setting, or yields the resolved
//! [`Settings`] together with advisory [`Diagnostic`]s for the caller to
//! surface.

pub mod schema;

pub use schema::*;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// A value that is exactly one environment reference: `$NAME` or `${NAME}`.
static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$(?:\{[A-Za-z_][A-Za-z0-9_]*\}|[A-Za-z_][A-Za-z0-9_]*)$")
        .expect("env reference regex")
});

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to expand {field}: {message}")]
    Expand { field: &'static str, message: String },

    #[error("TestRail {0} is required")]
    Missing(&'static str),
}

/// Loads configuration from a TOML file.
///
/// # Example
///
/// ```no_run
/// use testrail_reporter::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Path::new("testrail.toml"))?;
/// let validated = config.validate()?;
/// println!("Project: {}", validated.settings.project_id);
/// # Ok::<(), testrail_reporter::config::ConfigError>(())
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    load_config_str(&content)
}

/// Loads configuration from a TOML string.
pub fn load_config_str(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Validated, fully resolved reporter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// TestRail base URL without a trailing slash.
    pub host: String,
    pub username: String,
    pub api_key: String,
    pub project_id: u64,
    pub suite_id: Option<u64>,
    pub run_id: Option<u64>,
    pub milestone_id: Option<u64>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Version tag attached to every submitted result.
    pub version: Option<String>,
}

/// Advisory notes about how a run will be selected.
///
/// None of these prevent reporting; TestRail itself decides whether a
/// suite is required for the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// A run will be created under a milestone but no suite is configured.
    MilestoneWithoutSuite,
    /// A run will be created in a suite without a milestone.
    SuiteWithoutMilestone,
    /// A run will be created with neither a suite nor a milestone.
    NoSuiteOrMilestone,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Diagnostic::MilestoneWithoutSuite => {
                "Creating a new test run with milestone, but no suite_id provided. TestRail may require a suite_id depending on project settings."
            }
            Diagnostic::SuiteWithoutMilestone => {
                "Creating a new test run with suite_id but without milestone association."
            }
            Diagnostic::NoSuiteOrMilestone => {
                "Creating a new test run without suite_id or milestone. TestRail may require a suite_id depending on project settings."
            }
        };
        f.write_str(message)
    }
}

/// Outcome of successful validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub settings: Settings,
    pub diagnostics: Vec<Diagnostic>,
}

impl Config {
    /// Validates the configuration and resolves environment references.
    ///
    /// Mandatory settings are checked in the order host, username, API key,
    /// project id. Zero ids count as unset.
    pub fn validate(&self) -> ConfigResult<ValidatedConfig> {
        let tr = &self.testrail;

        let host = expand("host", &tr.host)?;
        let host = host.trim().trim_end_matches('/').to_string();
        if host.is_empty() {
            return Err(ConfigError::Missing("host"));
        }

        let username = expand_credential("username", &tr.username)?;
        if username.trim().is_empty() {
            return Err(ConfigError::Missing("username"));
        }

        let api_key = expand_credential("API key", &tr.api_key)?;
        if api_key.is_empty() {
            return Err(ConfigError::Missing("API key"));
        }

        if tr.project_id == 0 {
            return Err(ConfigError::Missing("project ID"));
        }

        let settings = Settings {
            host,
            username,
            api_key,
            project_id: tr.project_id,
            suite_id: tr.suite_id.filter(|&id| id > 0),
            run_id: tr.run_id.filter(|&id| id > 0),
            milestone_id: tr.milestone_id.filter(|&id| id > 0),
            timeout: Duration::from_secs(tr.timeout_secs),
            version: self.report.resolve_version(|name| std::env::var(name).ok()),
        };
        let diagnostics = diagnose(&settings);

        Ok(ValidatedConfig {
            settings,
            diagnostics,
        })
    }
}

impl ReportConfig {
    /// Resolves the version tag using `lookup` for environment variables.
    pub fn resolve_version(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(version) = self.version.as_ref().filter(|v| !v.is_empty()) {
            return Some(version.clone());
        }
        self.version_env
            .iter()
            .filter_map(|name| lookup(name.as_str()))
            .find(|value| !value.is_empty())
    }
}

fn diagnose(settings: &Settings) -> Vec<Diagnostic> {
    if settings.run_id.is_some() {
        return Vec::new();
    }
    let diagnostic = match (settings.milestone_id, settings.suite_id) {
        (Some(_), Some(_)) => return Vec::new(),
        (Some(_), None) => Diagnostic::MilestoneWithoutSuite,
        (None, Some(_)) => Diagnostic::SuiteWithoutMilestone,
        (None, None) => Diagnostic::NoSuiteOrMilestone,
    };
    vec![diagnostic]
}

/// Credentials are taken literally, so a `$` inside a password survives.
/// Only a value that is a single reference in its entirety is expanded.
fn expand_credential(field: &'static str, raw: &str) -> ConfigResult<String> {
    if ENV_REFERENCE.is_match(raw.trim()) {
        expand(field, raw.trim())
    } else {
        Ok(raw.to_string())
    }
}

fn expand(field: &'static str, raw: &str) -> ConfigResult<String> {
    shellexpand::env(raw)
        .map(|value| value.into_owned())
        .map_err(|e| ConfigError::Expand {
            field,
            message: e.to_string(),
        })
}
