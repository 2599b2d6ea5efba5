//! Reporting session: the hooks a host framework drives.
//!
//! # Lifecycle
//!
//! ```text
//!  ReporterSession::new(config)        validate config, fail fast
//!        │
//!  on_session_start()                  log only
//!        │
//!  on_test_finished(test) × N          extract case id, store outcome
//!        │
//!  on_session_finished()               nothing recorded → done, no calls
//!        │
//!        ├─ verify_connection()        get_project
//!        ├─ resolve_run()              get_run | add_run
//!        └─ submit_results()           add_result_for_case × cases
//! ```
//!
//! Remote calls happen only in `on_session_finished`, strictly one after
//! another.
//!
//! # Example
//!
//! ```no_run
//! use testrail_reporter::config::load_config;
//! use testrail_reporter::framework::TestFinished;
//! use testrail_reporter::session::ReporterSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(std::path::Path::new("testrail.toml"))?;
//!     let mut session = ReporterSession::new(&config)?;
//!
//!     session.on_session_start();
//!     session.on_test_finished(&TestFinished::new("C101 logs in", "passed"));
//!
//!     let report = session.on_session_finished().await?;
//!     println!("Submitted {} results", report.submitted.len());
//!     Ok(())
//! }
//! ```

use tracing::{debug, info};

use crate::case_id::{CaseId, extract_case_id_from_test};
use crate::config::{Config, Diagnostic, Settings, ValidatedConfig};
use crate::error::{ReporterError, ReporterResult};
use crate::framework::TestFinished;
use crate::report::{OutcomeRecord, ResultSet, SessionReport, submit_results};
use crate::testrail::{HttpClient, TestRailApi, resolve_run, verify_connection};

/// State of one test session.
pub struct ReporterSession<A> {
    settings: Settings,
    diagnostics: Vec<Diagnostic>,
    api: A,
    results: ResultSet,
}

impl ReporterSession<HttpClient> {
    /// Validates `config` and prepares a session talking to TestRail over
    /// HTTP. Configuration problems surface here, before any test runs.
    pub fn new(config: &Config) -> ReporterResult<Self> {
        let validated = config.validate()?;
        let api = HttpClient::new(&validated.settings).map_err(ReporterError::Client)?;
        Ok(Self::with_api(validated, api))
    }
}

impl<A: TestRailApi> ReporterSession<A> {
    /// Creates a session using a specific API implementation.
    pub fn with_api(validated: ValidatedConfig, api: A) -> Self {
        Self {
            settings: validated.settings,
            diagnostics: validated.diagnostics,
            api,
            results: ResultSet::new(),
        }
    }

    /// Resolved settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Advisory notes produced while validating the configuration.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Outcomes recorded so far.
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// Host hook for the start of a session.
    pub fn on_session_start(&self) {
        match self.settings.run_id {
            Some(run_id) => info!(
                "Reporting to TestRail project {}, run {}",
                self.settings.project_id, run_id
            ),
            None => info!(
                "Reporting to TestRail project {}, a new run will be created",
                self.settings.project_id
            ),
        }
    }

    /// Host hook for a finished test.
    ///
    /// Tests without a case id are ignored. Returns the id the outcome was
    /// stored under.
    pub fn on_test_finished(&mut self, test: &TestFinished) -> Option<CaseId> {
        let Some(case_id) = extract_case_id_from_test(&test.title, test.file.as_deref()) else {
            debug!("No TestRail case id in {:?}, not reporting it", test.title);
            return None;
        };

        let record = OutcomeRecord::from_test(case_id, test);
        debug!("Recorded {} as {:?}", case_id, record.status);
        if self.results.record(record).is_some() {
            debug!("{} finished again, keeping the latest outcome", case_id);
        }
        Some(case_id)
    }

    /// Host hook for the end of a session.
    ///
    /// Verifies connectivity, resolves the run, and submits every recorded
    /// outcome. Does nothing, and contacts nobody, when no outcome was
    /// recorded.
    pub async fn on_session_finished(self) -> ReporterResult<SessionReport> {
        if self.results.recorded() == 0 {
            info!("No TestRail cases recorded, nothing to report");
            return Ok(SessionReport::default());
        }

        verify_connection(&self.api, &self.settings).await?;

        let case_ids = self.results.case_ids();
        let run_id = resolve_run(&self.api, &self.settings, &case_ids).await?;

        if self.settings.version.is_none() {
            debug!("No version tag configured, results are submitted without one");
        }
        submit_results(
            &self.api,
            run_id,
            &self.results,
            self.settings.version.as_deref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testrail::fake::{CREATED_RUN_ID, Call, FakeTestRail, case, settings};
    use std::time::Duration;

    fn session(settings: Settings, api: FakeTestRail) -> ReporterSession<FakeTestRail> {
        let validated = ValidatedConfig {
            settings,
            diagnostics: Vec::new(),
        };
        ReporterSession::with_api(validated, api)
    }

    fn passed(title: &str) -> TestFinished {
        TestFinished::new(title, "passed").with_duration(Duration::from_millis(1200))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ReporterSession::new(&Config::default());
        assert!(matches!(result, Err(ReporterError::Config(_))));
    }

    #[test]
    fn test_tests_without_id_are_ignored() {
        let mut session = session(settings(), FakeTestRail::new());
        assert_eq!(session.on_test_finished(&passed("logs in")), None);
        assert_eq!(session.on_test_finished(&passed("logs in C5")), None);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_file_fallback_is_used() {
        let mut session = session(settings(), FakeTestRail::new());
        let test = passed("logs in").with_file("tests/login_C77.spec.ts");
        assert_eq!(session.on_test_finished(&test), Some(case(77)));
    }

    #[test]
    fn test_repeated_case_keeps_latest() {
        let mut session = session(settings(), FakeTestRail::new());
        session.on_test_finished(&TestFinished::new("C1 flaky", "failed"));
        session.on_test_finished(&passed("[C1] flaky"));

        let results = session.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results.recorded(), 2);
        assert_eq!(results.get(case(1)).unwrap().comment, "✅ Test passed in 1s");
    }

    #[tokio::test]
    async fn test_empty_session_makes_no_calls() {
        let api = FakeTestRail::new();
        let mut session = session(settings(), api.clone());
        session.on_test_finished(&passed("no id here"));

        let report = session.on_session_finished().await.unwrap();
        assert_eq!(report, SessionReport::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_full_pipeline_creates_run() {
        let api = FakeTestRail::new();
        let mut settings = settings();
        settings.milestone_id = Some(9);
        settings.version = Some("1.2.3".to_string());
        let mut session = session(settings, api.clone());

        session.on_test_finished(&passed("C2 second"));
        session.on_test_finished(&TestFinished::new("C1 first", "skipped"));

        let report = session.on_session_finished().await.unwrap();
        assert_eq!(report.run_id, Some(CREATED_RUN_ID));
        assert_eq!(report.submitted, [case(1), case(2)]);

        let calls = api.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], Call::GetProject(1));
        match &calls[1] {
            Call::AddRun(1, payload) => {
                assert_eq!(payload.case_ids, [case(1), case(2)]);
                assert_eq!(payload.milestone_id, Some(9));
                assert_eq!(payload.suite_id, None);
            }
            other => panic!("unexpected call: {:?}", other),
        }
        match &calls[2] {
            Call::AddResult(CREATED_RUN_ID, id, payload) => {
                assert_eq!(*id, case(1));
                assert_eq!(payload.status_id, 3);
                assert_eq!(payload.comment, "⏩ Test was skipped");
                assert_eq!(payload.version.as_deref(), Some("1.2.3"));
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_existing_run_is_reused() {
        let api = FakeTestRail::new();
        let mut settings = settings();
        settings.run_id = Some(42);
        let mut session = session(settings, api.clone());
        session.on_test_finished(&passed("C1 a"));

        let report = session.on_session_finished().await.unwrap();
        assert_eq!(report.run_id, Some(42));
        assert!(!api.calls().iter().any(|c| matches!(c, Call::AddRun(..))));
        assert_eq!(api.calls()[1], Call::GetRun(42));
    }

    #[tokio::test]
    async fn test_connection_failure_stops_everything() {
        let api = FakeTestRail::new().fail_project(401);
        let mut session = session(settings(), api.clone());
        session.on_test_finished(&passed("C1 a"));

        let err = session.on_session_finished().await.unwrap_err();
        assert!(matches!(err, ReporterError::Connection(_)));
        assert_eq!(api.calls(), [Call::GetProject(1)]);
    }

    #[tokio::test]
    async fn test_unusable_run_blocks_submission() {
        let api = FakeTestRail::new().fail_get_run(403);
        let mut settings = settings();
        settings.run_id = Some(42);
        let mut session = session(settings, api.clone());
        session.on_test_finished(&passed("C1 a"));

        let err = session.on_session_finished().await.unwrap_err();
        assert!(matches!(err, ReporterError::RunResolution { run_id: 42, .. }));
        assert!(api.submitted_cases().is_empty());
    }

    #[tokio::test]
    async fn test_run_creation_failure_blocks_submission() {
        let api = FakeTestRail::new().fail_add_run(400);
        let mut session = session(settings(), api.clone());
        session.on_test_finished(&passed("C1 a"));

        let err = session.on_session_finished().await.unwrap_err();
        assert!(matches!(err, ReporterError::RunCreation(_)));
        assert!(api.submitted_cases().is_empty());
    }

    #[tokio::test]
    async fn test_one_bad_request_still_succeeds() {
        let api = FakeTestRail::new().fail_result(2, 400);
        let mut session = session(settings(), api.clone());
        for title in ["C1 a", "C2 b", "C3 c"] {
            session.on_test_finished(&passed(title));
        }

        let report = session.on_session_finished().await.unwrap();
        assert_eq!(report.skipped, [case(2)]);
        assert_eq!(report.submitted, [case(1), case(3)]);
    }

    #[tokio::test]
    async fn test_one_server_error_fails_after_full_pass() {
        let api = FakeTestRail::new().fail_result(2, 500);
        let mut session = session(settings(), api.clone());
        for title in ["C1 a", "C2 b", "C3 c"] {
            session.on_test_finished(&passed(title));
        }

        let err = session.on_session_finished().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to report results for 1 test cases");
        assert_eq!(api.submitted_cases(), [1, 2, 3]);
    }
}
