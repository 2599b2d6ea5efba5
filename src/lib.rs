//! testrail-reporter: report automated test outcomes to TestRail.
//!
//! Tests name the TestRail case they cover at the start of their title
//! (`C123 logs in` or `[C123] logs in`). For one test session, the reporter
//! keeps the latest outcome of every such case, then at the end of the
//! session submits them all to a single TestRail run: an existing one named
//! in the configuration, or a new one seeded with exactly the reported
//! cases.
//!
//! # Architecture
//!
//! - **Case ids** ([`case_id`]): extracting ids from titles and file names
//! - **Statuses** ([`status`]): mapping host outcome labels to TestRail statuses
//! - **Reports** ([`report`]): outcome records, comments, sequential submission
//! - **TestRail** ([`testrail`]): API contract, HTTP client, run selection
//! - **Session** ([`session`]): the hooks a host test framework drives
//! - **Framework** ([`framework`]): host event types and the JUnit XML adapter
//!
//! # Example
//!
//! ```no_run
//! use testrail_reporter::config::load_config;
//! use testrail_reporter::framework::junit::read_junit_file;
//! use testrail_reporter::session::ReporterSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(std::path::Path::new("testrail.toml"))?;
//!     let mut session = ReporterSession::new(&config)?;
//!
//!     for test in read_junit_file(std::path::Path::new("junit.xml"))? {
//!         session.on_test_finished(&test);
//!     }
//!     session.on_session_finished().await?;
//!     Ok(())
//! }
//! ```

pub mod case_id;
pub mod config;
pub mod error;
pub mod framework;
pub mod report;
pub mod session;
pub mod status;
pub mod testrail;

// Re-export commonly used types
pub use case_id::{CaseId, extract_case_id, extract_case_id_from_test};
pub use config::{Config, Settings, load_config};
pub use error::{ReporterError, ReporterResult, ReportingFailure};
pub use framework::{ErrorDetail, TestFinished};
pub use report::{OutcomeRecord, SessionReport};
pub use session::ReporterSession;
pub use status::TestRailStatus;
pub use testrail::{HttpClient, TestRailApi};
