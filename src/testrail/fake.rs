//! In-memory [`TestRailApi`] that records every call, for pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::api::{
    AddResultPayload, AddRunPayload, ApiError, ApiResult, Project, ResultRecord, Run, RunId,
    TestRailApi,
};
use crate::case_id::CaseId;
use crate::config::Settings;

/// Run id assigned to runs created through the fake.
pub(crate) const CREATED_RUN_ID: RunId = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    GetProject(u64),
    GetRun(RunId),
    AddRun(u64, AddRunPayload),
    AddResult(RunId, CaseId, AddResultPayload),
}

#[derive(Clone, Default)]
pub(crate) struct FakeTestRail {
    calls: Arc<Mutex<Vec<Call>>>,
    project_status: Option<u16>,
    get_run_status: Option<u16>,
    add_run_status: Option<u16>,
    result_statuses: HashMap<u64, u16>,
}

impl FakeTestRail {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_project(mut self, status: u16) -> Self {
        self.project_status = Some(status);
        self
    }

    pub(crate) fn fail_get_run(mut self, status: u16) -> Self {
        self.get_run_status = Some(status);
        self
    }

    pub(crate) fn fail_add_run(mut self, status: u16) -> Self {
        self.add_run_status = Some(status);
        self
    }

    pub(crate) fn fail_result(mut self, case_id: u64, status: u16) -> Self {
        self.result_statuses.insert(case_id, status);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Case ids of every attempted result submission, in call order.
    pub(crate) fn submitted_cases(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddResult(_, case_id, _) => Some(case_id.get()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(operation: &'static str, status: Option<u16>) -> ApiResult<()> {
    match status {
        Some(status) => Err(ApiError::Status {
            operation,
            status,
            body: format!("{{\"error\": \"rejected with {}\"}}", status),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl TestRailApi for FakeTestRail {
    async fn get_project(&self, project_id: u64) -> ApiResult<Project> {
        self.record(Call::GetProject(project_id));
        rejected("get_project", self.project_status)?;
        Ok(Project {
            id: project_id,
            name: "Demo".to_string(),
            is_completed: false,
            url: None,
        })
    }

    async fn get_run(&self, run_id: RunId) -> ApiResult<Run> {
        self.record(Call::GetRun(run_id));
        rejected("get_run", self.get_run_status)?;
        Ok(run(run_id, "Existing"))
    }

    async fn add_run(&self, project_id: u64, payload: &AddRunPayload) -> ApiResult<Run> {
        self.record(Call::AddRun(project_id, payload.clone()));
        rejected("add_run", self.add_run_status)?;
        Ok(run(CREATED_RUN_ID, &payload.name))
    }

    async fn add_result_for_case(
        &self,
        run_id: RunId,
        case_id: CaseId,
        payload: &AddResultPayload,
    ) -> ApiResult<Option<ResultRecord>> {
        self.record(Call::AddResult(run_id, case_id, payload.clone()));
        rejected(
            "add_result_for_case",
            self.result_statuses.get(&case_id.get()).copied(),
        )?;
        Ok(Some(ResultRecord {
            id: case_id.get() * 10,
            test_id: None,
            status_id: Some(payload.status_id),
        }))
    }
}

fn run(id: RunId, name: &str) -> Run {
    Run {
        id,
        name: name.to_string(),
        suite_id: None,
        milestone_id: None,
        is_completed: false,
        url: None,
    }
}

/// Valid settings for project 1 that create a new run.
pub(crate) fn settings() -> Settings {
    Settings {
        host: "https://example.testrail.io".to_string(),
        username: "ci@example.com".to_string(),
        api_key: "secret".to_string(),
        project_id: 1,
        suite_id: None,
        run_id: None,
        milestone_id: None,
        timeout: Duration::from_secs(5),
        version: None,
    }
}

pub(crate) fn case(id: u64) -> CaseId {
    CaseId::new(id).unwrap()
}
