//! Result aggregation and submission.
//!
//! Finished tests are folded into a [`ResultSet`], one [`OutcomeRecord`]
//! per case id. When the session ends, [`submit_results`] sends every
//! record to the resolved run, one request at a time. A rejected
//! submission never stops the pass:
//!
//! | Response | Treatment |
//! |----------|-----------|
//! | 2xx | submitted |
//! | `400 Bad Request` | skipped (case not in the run), logged |
//! | anything else | failed, logged, reported once the pass is over |

pub mod comment;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::case_id::CaseId;
use crate::error::{ReporterResult, ReportingFailure};
use crate::framework::TestFinished;
use crate::status::TestRailStatus;
use crate::testrail::{AddResultPayload, RunId, TestRailApi};

pub use comment::{format_comment, format_error};

/// The normalized result of one finished test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub case_id: CaseId,
    pub status: TestRailStatus,
    pub comment: String,
}

impl OutcomeRecord {
    /// Builds the record for a finished test carrying `case_id`.
    pub fn from_test(case_id: CaseId, test: &TestFinished) -> Self {
        Self {
            case_id,
            status: TestRailStatus::from_label(&test.status),
            comment: format_comment(&test.status, test.duration, test.error.as_ref()),
        }
    }

    fn payload(&self, version: Option<&str>) -> AddResultPayload {
        AddResultPayload {
            status_id: self.status.id(),
            comment: self.comment.clone(),
            version: version.map(str::to_string),
        }
    }
}

/// Outcome records of one session, keyed by case id.
///
/// Recording a case twice keeps only the later record. Iteration is in
/// ascending case id order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: BTreeMap<CaseId, OutcomeRecord>,
    recorded: usize,
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record, returning the one it replaced.
    pub fn record(&mut self, record: OutcomeRecord) -> Option<OutcomeRecord> {
        self.recorded += 1;
        self.records.insert(record.case_id, record)
    }

    /// Number of records ever stored, counting replaced ones.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Number of distinct cases.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, case_id: CaseId) -> Option<&OutcomeRecord> {
        self.records.get(&case_id)
    }

    /// Every distinct case id, ascending.
    pub fn case_ids(&self) -> Vec<CaseId> {
        self.records.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.values()
    }
}

/// What a completed session sent to TestRail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// The run results went to; `None` when nothing was reported.
    pub run_id: Option<RunId>,

    /// Cases whose result was stored.
    pub submitted: Vec<CaseId>,

    /// Cases TestRail rejected with `400 Bad Request`.
    pub skipped: Vec<CaseId>,
}

/// Submits every record in `results` to `run_id`, sequentially.
///
/// All records are attempted. If any submission failed for a reason other
/// than `400 Bad Request`, a single [`ReportingFailure`] is returned after
/// the pass.
pub async fn submit_results<A: TestRailApi + ?Sized>(
    api: &A,
    run_id: RunId,
    results: &ResultSet,
    version: Option<&str>,
) -> ReporterResult<SessionReport> {
    let mut submitted = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    for record in results.iter() {
        let case_id = record.case_id;
        match api
            .add_result_for_case(run_id, case_id, &record.payload(version))
            .await
        {
            Ok(stored) => {
                debug!(
                    "Submitted {} as {:?} (result {:?})",
                    case_id,
                    record.status,
                    stored.map(|r| r.id)
                );
                submitted.push(case_id);
            }
            Err(e) if e.is_bad_request() => {
                warn!(
                    "Skipping result for case {} in run {} due to 400 Bad Request: {}",
                    case_id, run_id, e
                );
                skipped.push(case_id);
            }
            Err(e) => {
                error!("Failed to add result for case {} in run {}: {}", case_id, run_id, e);
                failed.push(case_id);
            }
        }
    }

    info!(
        "Reported {} results to run {} ({} skipped, {} failed)",
        submitted.len(),
        run_id,
        skipped.len(),
        failed.len()
    );

    if !failed.is_empty() {
        return Err(ReportingFailure {
            run_id,
            failed,
            skipped,
        }
        .into());
    }

    Ok(SessionReport {
        run_id: Some(run_id),
        submitted,
        skipped,
    })
}

/// Prints a summary of a completed session to the console.
pub fn print_summary(report: &SessionReport) {
    println!();
    println!("TestRail Report:");
    match report.run_id {
        Some(run_id) => println!("  Run:       {}", run_id),
        None => {
            println!(
                "  {}",
                console::style("No test cases with TestRail ids were found.").yellow()
            );
            return;
        }
    }
    println!("  Submitted: {}", console::style(report.submitted.len()).green());
    println!("  Skipped:   {}", console::style(report.skipped.len()).yellow());

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped cases (not part of the run?):");
        for case_id in &report.skipped {
            println!("  - {}", case_id);
        }
    }
}

/// Prints the cases behind a [`ReportingFailure`].
pub fn print_failure(failure: &ReportingFailure) {
    println!();
    println!(
        "{}",
        console::style(format!(
            "Failed to report {} results to run {}:",
            failure.failed.len(),
            failure.run_id
        ))
        .red()
        .bold()
    );
    for case_id in &failure.failed {
        println!("  - {}", case_id);
    }
    if !failure.skipped.is_empty() {
        println!(
            "  {}",
            console::style(format!("({} cases skipped with 400 Bad Request)", failure.skipped.len()))
                .dim()
        );
    }
}
