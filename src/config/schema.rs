//! Configuration schema definitions for testrail-reporter.
//!
//! # Schema Overview
//!
//! ```text
//! Config (root)
//! ├── TestRailConfig   - Connection details and run selection
//! └── ReportConfig     - Result submission settings
//! ```

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// # TOML Structure
///
/// ```toml
/// [testrail]
/// host = "https://example.testrail.io"
/// username = "ci@example.com"
/// api_key = "${TESTRAIL_API_KEY}"
/// project_id = 1
/// suite_id = 2
///
/// [report]
/// version_env = ["GIT_SHA"]
/// ```
///
/// # Example
///
/// ```
/// use testrail_reporter::config::Config;
///
/// let config: Config = toml::from_str(r#"
///     [testrail]
///     host = "https://example.testrail.io"
///     username = "ci@example.com"
///     api_key = "secret"
///     project_id = 1
/// "#).unwrap();
/// assert_eq!(config.testrail.project_id, 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// TestRail connection and run selection.
    #[serde(default)]
    pub testrail: TestRailConfig,

    /// Result submission settings (optional, has defaults).
    #[serde(default)]
    pub report: ReportConfig,
}

/// TestRail connection details.
///
/// `host`, `username`, `api_key` and `project_id` are mandatory; they are
/// allowed to be missing here so that validation can name the missing one.
///
/// String fields may reference environment variables (`$VAR` or `${VAR}`),
/// expanded during validation. `host` is expanded anywhere in the value;
/// `username` and `api_key` only when the value is one reference.
///
/// # Run selection
///
/// | `run_id` | Behavior |
/// |----------|----------|
/// | set | Results go to that existing run |
/// | unset | A new run is created with every reported case, attached to `suite_id` and `milestone_id` when set |
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TestRailConfig {
    /// Base URL of the TestRail instance, e.g. `https://example.testrail.io`.
    pub host: String,

    /// Account used for API calls.
    pub username: String,

    /// API key (or password) for `username`. Taken literally unless the
    /// whole value is an environment reference such as `${TESTRAIL_API_KEY}`.
    pub api_key: String,

    /// Project the results belong to. Zero means unset.
    pub project_id: u64,

    /// Suite for newly created runs.
    pub suite_id: Option<u64>,

    /// Existing run to report into.
    pub run_id: Option<u64>,

    /// Milestone for newly created runs.
    pub milestone_id: Option<u64>,

    /// Per-request HTTP timeout in seconds.
    ///
    /// Default: 30
    pub timeout_secs: u64,
}

impl Default for TestRailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            api_key: String::new(),
            project_id: 0,
            suite_id: None,
            run_id: None,
            milestone_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Result submission settings.
///
/// Every submitted result may carry a `version` tag identifying the build
/// under test.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `version` | None |
/// | `version_env` | `["TEST_VERSION", "CI_COMMIT_SHA"]` |
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Fixed version tag. Takes precedence over `version_env`.
    pub version: Option<String>,

    /// Environment variables consulted in order for the version tag.
    ///
    /// The first one that is set and non-empty wins. When none is, results
    /// are submitted without a version.
    pub version_env: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            version: None,
            version_env: default_version_env(),
        }
    }
}

fn default_version_env() -> Vec<String> {
    vec!["TEST_VERSION".to_string(), "CI_COMMIT_SHA".to_string()]
}
