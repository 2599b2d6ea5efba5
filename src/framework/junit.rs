//! JUnit XML report ingestion.
//!
//! Turns every `<testcase>` of a JUnit XML report into a [`TestFinished`]
//! event, so runners without a native integration (cargo nextest, pytest,
//! jest-junit, Playwright's junit reporter) can still report to TestRail.
//!
//! # Mapping
//!
//! | JUnit | Event |
//! |-------|-------|
//! | `name` attribute | `title` |
//! | `file` attribute (testcase, else enclosing testsuite) | `file` |
//! | `time` attribute, seconds | `duration` |
//! | no child element | status `passed` |
//! | `<failure>` or `<error>` | status `failed`, error from `type`, `message` and body |
//! | `<skipped>` | status `skipped` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::{ErrorDetail, TestFinished};

/// Result type for JUnit ingestion.
pub type JunitResult<T> = Result<T, JunitError>;

/// Errors that can occur while reading a JUnit report.
#[derive(Debug, thiserror::Error)]
pub enum JunitError {
    #[error("Failed to read JUnit report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JUnit XML: {0}")]
    Parse(String),
}

/// Reads a JUnit XML file and returns one event per test case.
pub fn read_junit_file(path: &Path) -> JunitResult<Vec<TestFinished>> {
    let content = std::fs::read_to_string(path).map_err(|source| JunitError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_junit_xml(&content)?;
    debug!("Read {} test cases from {}", events.len(), path.display());
    Ok(events)
}

/// Parses JUnit XML content into test-finished events, in document order.
pub fn parse_junit_xml(content: &str) -> JunitResult<Vec<TestFinished>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut parser = JunitParser::default();
    loop {
        let event = reader
            .read_event()
            .map_err(|e| JunitError::Parse(format!("at byte {}: {}", reader.buffer_position(), e)))?;

        match event {
            Event::Start(e) => parser.open(&e)?,
            Event::Empty(e) => {
                parser.open(&e)?;
                parser.close(e.name().as_ref());
            }
            Event::End(e) => parser.close(e.name().as_ref()),
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| JunitError::Parse(e.to_string()))?;
                parser.text(&text);
            }
            Event::CData(c) => parser.text(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parser.cases)
}

#[derive(Default)]
struct JunitParser {
    cases: Vec<TestFinished>,
    /// `file` attribute of each open testsuite, innermost last.
    suite_files: Vec<Option<PathBuf>>,
    current: Option<TestFinished>,
    /// Body of the open `<failure>`/`<error>` element.
    failure_body: Option<String>,
}

impl JunitParser {
    fn open(&mut self, element: &BytesStart<'_>) -> JunitResult<()> {
        match element.name().as_ref() {
            b"testsuite" => {
                let file = attribute(element, b"file")?.map(PathBuf::from);
                self.suite_files.push(file);
            }
            b"testcase" => {
                let title = attribute(element, b"name")?.unwrap_or_default();
                let mut case = TestFinished::new(title, "passed");
                case.file = match attribute(element, b"file")? {
                    Some(file) => Some(PathBuf::from(file)),
                    None => self.suite_files.last().cloned().flatten(),
                };
                case.duration = attribute(element, b"time")?.and_then(|t| parse_seconds(&t));
                self.current = Some(case);
            }
            b"failure" | b"error" => {
                if let Some(case) = self.current.as_mut() {
                    case.status = "failed".to_string();
                    case.error = Some(ErrorDetail::Structured {
                        name: attribute(element, b"type")?.unwrap_or_default(),
                        message: attribute(element, b"message")?.unwrap_or_default(),
                        stack: None,
                    });
                    self.failure_body = Some(String::new());
                }
            }
            b"skipped" => {
                if let Some(case) = self.current.as_mut() {
                    case.status = "skipped".to_string();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(body) = self.failure_body.as_mut() {
            body.push_str(text);
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"testsuite" => {
                self.suite_files.pop();
            }
            b"testcase" => {
                if let Some(case) = self.current.take() {
                    self.cases.push(case);
                }
            }
            b"failure" | b"error" => {
                let body = self.failure_body.take().unwrap_or_default();
                if let Some(ErrorDetail::Structured { stack, .. }) =
                    self.current.as_mut().and_then(|case| case.error.as_mut())
                    && !body.trim().is_empty()
                {
                    *stack = Some(body.trim().to_string());
                }
            }
            _ => {}
        }
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> JunitResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| JunitError::Parse(e.to_string()))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| JunitError::Parse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_seconds(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}
