//! Run selection.
//!
//! A session reports into exactly one run. It is either the run named by
//! `testrail.run_id`, which must already exist, or a fresh run created for
//! the session and seeded with every case the session saw. The two paths
//! never mix: reusing a run does not add cases to it, and a missing run is
//! never replaced by a new one.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use super::api::{AddRunPayload, RunId, TestRailApi};
use crate::case_id::CaseId;
use crate::config::Settings;
use crate::error::{ReporterError, ReporterResult};

/// Prefix of the names given to created runs.
pub const RUN_NAME_PREFIX: &str = "Automated Test Run";

/// Description given to created runs.
pub const RUN_DESCRIPTION: &str = "Automated test run created by testrail-reporter";

/// Returns the run this session's results belong to.
pub async fn resolve_run<A: TestRailApi + ?Sized>(
    api: &A,
    settings: &Settings,
    case_ids: &[CaseId],
) -> ReporterResult<RunId> {
    match settings.run_id {
        Some(run_id) => find_existing_run(api, run_id).await,
        None => create_run(api, settings, case_ids, Utc::now()).await,
    }
}

/// Confirms a configured run exists and is accessible.
pub async fn find_existing_run<A: TestRailApi + ?Sized>(api: &A, run_id: RunId) -> ReporterResult<RunId> {
    let run = api
        .get_run(run_id)
        .await
        .map_err(|source| ReporterError::RunResolution { run_id, source })?;

    info!("Using existing test run {} ({})", run.id, run.name);
    Ok(run.id)
}

/// Creates a run holding exactly `case_ids`.
pub async fn create_run<A: TestRailApi + ?Sized>(
    api: &A,
    settings: &Settings,
    case_ids: &[CaseId],
    now: DateTime<Utc>,
) -> ReporterResult<RunId> {
    let payload = build_run_payload(settings, case_ids, now);
    let run = api
        .add_run(settings.project_id, &payload)
        .await
        .map_err(ReporterError::RunCreation)?;

    info!(
        "Created test run {} ({}) with {} cases",
        run.id,
        payload.name,
        payload.case_ids.len()
    );
    Ok(run.id)
}

/// Builds the `add_run` request for a new run.
pub fn build_run_payload(settings: &Settings, case_ids: &[CaseId], now: DateTime<Utc>) -> AddRunPayload {
    AddRunPayload {
        suite_id: settings.suite_id,
        name: run_name(now),
        description: Some(RUN_DESCRIPTION.to_string()),
        milestone_id: settings.milestone_id,
        include_all: false,
        case_ids: case_ids.to_vec(),
    }
}

/// Name of a run created at `now`, e.g.
/// `Automated Test Run - 2024-05-01T12-30-05-123Z`.
pub fn run_name(now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{} - {}", RUN_NAME_PREFIX, timestamp)
}
