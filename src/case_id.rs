//! TestRail case identifier extraction.
//!
//! Tests opt into reporting by naming the TestRail case they cover at the
//! very start of their title:
//!
//! ```text
//! C12345 user can log in
//! [C12345] user can log in
//! ```
//!
//! An identifier anywhere else in the title is ignored. When the title does
//! not carry one, the basename of the test's source file is consulted as a
//! looser fallback (`login_C12345.spec.ts`).

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TITLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[C(\d+)\]|C(\d+))\s").expect("title prefix regex"));

static FILE_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"C(\d+)").expect("file stem regex"));

/// Identifier of a test case in TestRail.
///
/// Always positive. Displays as `C<digits>`, the form used in test titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(u64);

impl CaseId {
    /// Wraps a raw id, rejecting zero.
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    /// The numeric id as TestRail expects it in URLs and payloads.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Extracts the case id from the start of a test title.
///
/// # Example
///
/// ```
/// use testrail_reporter::case_id::extract_case_id;
///
/// assert_eq!(extract_case_id("C12345 logs in").map(|id| id.get()), Some(12345));
/// assert_eq!(extract_case_id("[C12345] logs in").map(|id| id.get()), Some(12345));
/// assert!(extract_case_id("logs in C12345").is_none());
/// ```
pub fn extract_case_id(title: &str) -> Option<CaseId> {
    let caps = TITLE_PREFIX.captures(title)?;
    let digits = caps.get(1).or_else(|| caps.get(2))?;
    parse_digits(digits.as_str())
}

/// Extracts the case id for a finished test.
///
/// The title is tried first. If it carries no id and a source file is
/// known, any `C<digits>` run in the file's basename (extension stripped)
/// is accepted.
pub fn extract_case_id_from_test(title: &str, file: Option<&Path>) -> Option<CaseId> {
    extract_case_id(title).or_else(|| {
        let stem = file?.file_stem()?.to_str()?;
        let caps = FILE_STEM.captures(stem)?;
        parse_digits(caps.get(1)?.as_str())
    })
}

fn parse_digits(digits: &str) -> Option<CaseId> {
    digits.parse::<u64>().ok().and_then(CaseId::new)
}
