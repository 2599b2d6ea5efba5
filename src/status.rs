//! Mapping of host test outcomes onto TestRail result statuses.

use serde::{Deserialize, Serialize};

/// Built-in TestRail result statuses.
///
/// The discriminants are the `status_id` values TestRail uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestRailStatus {
    Passed = 1,
    Blocked = 2,
    Untested = 3,
    Retest = 4,
    Failed = 5,
}

impl TestRailStatus {
    /// Normalizes a host outcome label, ignoring case.
    ///
    /// Unknown labels, including ones a host may add in the future, map to
    /// [`TestRailStatus::Untested`].
    ///
    /// ```
    /// use testrail_reporter::status::TestRailStatus;
    ///
    /// assert_eq!(TestRailStatus::from_label("PASSED"), TestRailStatus::Passed);
    /// assert_eq!(TestRailStatus::from_label("timedOut"), TestRailStatus::Untested);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "passed" => TestRailStatus::Passed,
            "failed" => TestRailStatus::Failed,
            "blocked" => TestRailStatus::Blocked,
            "skipped" | "todo" => TestRailStatus::Untested,
            _ => TestRailStatus::Untested,
        }
    }

    /// The numeric `status_id` sent to TestRail.
    pub fn id(self) -> u8 {
        self as u8
    }
}
