//! Human-readable result comments.
//!
//! Every submitted result carries a short comment shown in the TestRail UI:
//!
//! ```text
//! ✅ Test passed in 2s
//!
//! ❌ Test failed in 1s
//!
//! AssertionError: expected 401, got 200
//!
//! Stack trace:
//! at auth.spec.ts:12
//!
//! ⏩ Test was skipped
//!
//! ⚠️ Test result: timedOut
//! ```

use std::time::Duration;

use crate::framework::ErrorDetail;

/// Formats the comment for a finished test.
///
/// `status` is the host outcome label, matched case-insensitively. The
/// elapsed time is rounded to whole seconds and left empty when no duration
/// was measured. A measured zero duration still renders as `0s`; only an
/// absent one is left empty. A failed test without an error gets no error
/// block.
pub fn format_comment(status: &str, duration: Option<Duration>, error: Option<&ErrorDetail>) -> String {
    let elapsed = duration.map(format_elapsed).unwrap_or_default();

    match status.to_ascii_lowercase().as_str() {
        "passed" => format!("✅ Test passed in {}", elapsed),
        "failed" => match error {
            Some(error) => format!("❌ Test failed in {}\n\n{}", elapsed, format_error(error)),
            None => format!("❌ Test failed in {}", elapsed),
        },
        "skipped" => "⏩ Test was skipped".to_string(),
        _ => format!("⚠️ Test result: {}", status),
    }
}

/// Renders an error for inclusion in a comment.
///
/// Plain messages are returned verbatim. Structured errors render as
/// `Name: message`, followed by the stack trace when one is present.
pub fn format_error(error: &ErrorDetail) -> String {
    match error {
        ErrorDetail::Message(message) => message.clone(),
        ErrorDetail::Structured {
            name,
            message,
            stack,
        } => {
            let name = if name.is_empty() { "Error" } else { name };
            let message = if message.is_empty() { "Unknown error" } else { message };
            let headline = format!("{}: {}", name, message);
            match stack.as_deref().filter(|s| !s.is_empty()) {
                Some(stack) => format!("{}\n\nStack trace:\n{}", headline, stack),
                None => headline,
            }
        }
    }
}

fn format_elapsed(duration: Duration) -> String {
    format!("{}s", (duration.as_millis() as f64 / 1000.0).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(name: &str, message: &str, stack: Option<&str>) -> ErrorDetail {
        ErrorDetail::Structured {
            name: name.to_string(),
            message: message.to_string(),
            stack: stack.map(str::to_string),
        }
    }

    #[test]
    fn test_passed_rounds_duration() {
        let comment = format_comment("passed", Some(Duration::from_millis(1500)), None);
        assert_eq!(comment, "✅ Test passed in 2s");

        let comment = format_comment("passed", Some(Duration::from_millis(1499)), None);
        assert_eq!(comment, "✅ Test passed in 1s");
    }

    #[test]
    fn test_passed_without_duration() {
        assert_eq!(format_comment("passed", None, None), "✅ Test passed in ");
    }

    #[test]
    fn test_failed_with_error() {
        let error = structured("AssertionError", "expected 1", Some("at foo.ts:3"));
        let comment = format_comment("failed", Some(Duration::from_millis(800)), Some(&error));
        assert_eq!(
            comment,
            "❌ Test failed in 1s\n\nAssertionError: expected 1\n\nStack trace:\nat foo.ts:3"
        );
    }

    #[test]
    fn test_failed_without_error_omits_block() {
        let comment = format_comment("failed", Some(Duration::from_secs(3)), None);
        assert_eq!(comment, "❌ Test failed in 3s");
    }

    #[test]
    fn test_skipped_ignores_details() {
        let error = ErrorDetail::Message("not run".to_string());
        let comment = format_comment("skipped", Some(Duration::from_secs(9)), Some(&error));
        assert_eq!(comment, "⏩ Test was skipped");
    }

    #[test]
    fn test_other_status_keeps_label() {
        assert_eq!(format_comment("timedOut", None, None), "⚠️ Test result: timedOut");
    }

    #[test]
    fn test_status_case_insensitive() {
        assert_eq!(format_comment("PASSED", Some(Duration::ZERO), None), "✅ Test passed in 0s");
    }

    #[test]
    fn test_format_error_variants() {
        assert_eq!(format_error(&ErrorDetail::Message("raw text".to_string())), "raw text");
        assert_eq!(format_error(&structured("TypeError", "bad", None)), "TypeError: bad");
        assert_eq!(format_error(&structured("", "", Some(""))), "Error: Unknown error");
    }
}
