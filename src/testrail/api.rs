//! TestRail API contract: the four operations the reporter relies on.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::case_id::CaseId;

/// Identifier of a TestRail run.
pub type RunId = u64;

/// Result type for TestRail API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single TestRail API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{operation} failed: HTTP {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} returned an unreadable response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of the rejection, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { source, .. } | ApiError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
        }
    }

    /// True for `400 Bad Request`, which TestRail returns for case ids that
    /// are not part of the run.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ApiError::Status { status: 400, .. })
    }
}

/// A TestRail project, as returned by `get_project`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// A TestRail run, as returned by `get_run` and `add_run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub suite_id: Option<u64>,
    #[serde(default)]
    pub milestone_id: Option<u64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of an `add_run` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRunPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    pub include_all: bool,
    pub case_ids: Vec<CaseId>,
}

/// Body of an `add_result_for_case` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResultPayload {
    pub status_id: u8,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A stored result, as returned by `add_result_for_case`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: u64,
    #[serde(default)]
    pub test_id: Option<u64>,
    #[serde(default)]
    pub status_id: Option<u8>,
}

/// The TestRail operations used by the reporter.
///
/// Each call either succeeds with a value or fails with an [`ApiError`];
/// no call is retried.
#[async_trait]
pub trait TestRailApi: Send + Sync {
    /// Fetches a project. Used as the connectivity check.
    async fn get_project(&self, project_id: u64) -> ApiResult<Project>;

    /// Fetches an existing run.
    async fn get_run(&self, run_id: RunId) -> ApiResult<Run>;

    /// Creates a run in a project.
    async fn add_run(&self, project_id: u64, payload: &AddRunPayload) -> ApiResult<Run>;

    /// Submits one result for a case in a run.
    ///
    /// Returns the stored result when the response body describes one.
    async fn add_result_for_case(
        &self,
        run_id: RunId,
        case_id: CaseId,
        payload: &AddResultPayload,
    ) -> ApiResult<Option<ResultRecord>>;
}

#[async_trait]
impl<T: TestRailApi + ?Sized> TestRailApi for Arc<T> {
    async fn get_project(&self, project_id: u64) -> ApiResult<Project> {
        (**self).get_project(project_id).await
    }

    async fn get_run(&self, run_id: RunId) -> ApiResult<Run> {
        (**self).get_run(run_id).await
    }

    async fn add_run(&self, project_id: u64, payload: &AddRunPayload) -> ApiResult<Run> {
        (**self).add_run(project_id, payload).await
    }

    async fn add_result_for_case(
        &self,
        run_id: RunId,
        case_id: CaseId,
        payload: &AddResultPayload,
    ) -> ApiResult<Option<ResultRecord>> {
        (**self).add_result_for_case(run_id, case_id, payload).await
    }
}
