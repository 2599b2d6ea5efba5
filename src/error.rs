//! Errors surfaced to the host framework.
//!
//! | Error | When | Effect |
//! |-------|------|--------|
//! | [`ReporterError::Config`] | session construction | nothing is recorded |
//! | [`ReporterError::Client`] | session construction, HTTP client setup | nothing is recorded |
//! | [`ReporterError::Connection`] | session end, project check | no run resolved, nothing submitted |
//! | [`ReporterError::RunResolution`] | session end, configured run unusable | nothing submitted |
//! | [`ReporterError::RunCreation`] | session end, new run rejected | nothing submitted |
//! | [`ReporterError::Reporting`] | after the submission pass | every case was attempted |

use crate::case_id::CaseId;
use crate::config::ConfigError;
use crate::testrail::{ApiError, RunId};

/// Result type for reporter operations.
pub type ReporterResult<T> = Result<T, ReporterError>;

/// Fatal reporter errors.
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create TestRail client: {0}")]
    Client(#[source] ApiError),

    #[error("Failed to connect to TestRail: {0}")]
    Connection(#[source] ApiError),

    #[error("Could not find or access test run with ID {run_id}")]
    RunResolution {
        run_id: RunId,
        #[source]
        source: ApiError,
    },

    #[error("Failed to create new TestRail run")]
    RunCreation(#[source] ApiError),

    #[error(transparent)]
    Reporting(#[from] ReportingFailure),
}

/// Some results could not be submitted.
///
/// Raised once, after every stored result was attempted. `skipped` lists
/// the cases TestRail rejected with `400 Bad Request`; they do not count
/// as failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to report results for {} test cases", failed.len())]
pub struct ReportingFailure {
    pub run_id: RunId,
    pub failed: Vec<CaseId>,
    pub skipped: Vec<CaseId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporting_failure_message_counts_failures() {
        let failure = ReportingFailure {
            run_id: 7,
            failed: vec![CaseId::new(1).unwrap(), CaseId::new(2).unwrap()],
            skipped: vec![CaseId::new(3).unwrap()],
        };
        assert_eq!(
            ReporterError::from(failure).to_string(),
            "Failed to report results for 2 test cases"
        );
    }

    #[test]
    fn test_connection_error_keeps_cause() {
        let err = ReporterError::Connection(ApiError::Status {
            operation: "get_project",
            status: 401,
            body: "unauthorized".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to connect to TestRail: get_project failed: HTTP 401: unauthorized"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_client_error_is_not_a_connection_error() {
        let source = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        let err = ReporterError::Client(ApiError::Transport {
            operation: "create HTTP client",
            source,
        });
        assert!(err.to_string().starts_with("Failed to create TestRail client: create HTTP client failed"));
        assert!(!matches!(err, ReporterError::Connection(_)));
    }
}
