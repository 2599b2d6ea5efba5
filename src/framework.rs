//! Host test framework boundary.
//!
//! A host framework reports each finished test as a [`TestFinished`] event.
//! Any framework whose lifecycle hooks can produce these events can drive a
//! [`ReporterSession`](crate::session::ReporterSession): call
//! `on_test_finished` from its per-test hook and `on_session_finished` from
//! its end-of-run hook.
//!
//! The bundled [`junit`] adapter replays JUnit XML reports, which nearly
//! every test runner can emit.

pub mod junit;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error attached to a failed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// A plain message reported as-is.
    Message(String),

    /// An exception-like error with a type name and optional stack trace.
    Structured {
        /// Error type, e.g. `AssertionError`. Defaults to `Error` when empty.
        name: String,
        message: String,
        stack: Option<String>,
    },
}

/// A test that finished, as reported by the host framework.
///
/// `status` is the host's own outcome label (`passed`, `failed`,
/// `skipped`, `timedOut`, ...). It is normalized later, so hosts pass it
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFinished {
    /// Declared test title, which may start with a case id.
    pub title: String,

    /// Source file that declared the test, when known.
    pub file: Option<PathBuf>,

    /// Host outcome label.
    pub status: String,

    /// Wall-clock duration, when the host measured one.
    pub duration: Option<Duration>,

    /// Error for failed tests.
    pub error: Option<ErrorDetail>,
}

impl TestFinished {
    /// Creates an event with the given title and outcome label.
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file: None,
            status: status.into(),
            duration: None,
            error: None,
        }
    }

    /// Sets the source file.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the error.
    pub fn with_error(mut self, error: ErrorDetail) -> Self {
        self.error = Some(error);
        self
    }
}
