//! Connectivity check.

use tracing::info;

use super::api::{Project, TestRailApi};
use crate::config::Settings;
use crate::error::{ReporterError, ReporterResult};

/// Confirms the credentials work and the configured project exists.
pub async fn verify_connection<A: TestRailApi + ?Sized>(
    api: &A,
    settings: &Settings,
) -> ReporterResult<Project> {
    let project = api
        .get_project(settings.project_id)
        .await
        .map_err(ReporterError::Connection)?;

    info!("Connected to TestRail project {} ({})", project.name, project.id);
    Ok(project)
}
