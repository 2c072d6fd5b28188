//! Audit trail of simc invocations.

use serde::{Deserialize, Serialize};

/// Prefix of the error text recorded when simc exceeded its timeout.
pub const TIMED_OUT: &str = "timed out";

/// One `run()` invocation. Records are appended and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Executable followed by every argument, space separated.
    pub query: String,
    /// Exit code, absent when simc did not start, timed out or was killed.
    pub return_code: Option<i32>,
    /// Captured stdout.
    pub output: Option<String>,
    /// Captured stderr, or the reason simc could not be run.
    pub error: Option<String>,
}

impl HistoryRecord {
    pub fn timed_out(&self) -> bool {
        self.return_code.is_none()
            && self
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with(TIMED_OUT))
    }

    /// True when simc ran to completion and exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.return_code == Some(0)
    }
}

/// Join the executable and its arguments into a single display string.
pub(crate) fn query_string(executable: &str, tokens: &[String]) -> String {
    std::iter::once(executable)
        .chain(tokens.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode a captured stream, mapping empty output to `None`.
pub(crate) fn captured(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_with_spaces() {
        let tokens = vec!["iterations=10".to_string(), "p.simc".to_string()];
        assert_eq!(query_string("/opt/simc", &tokens), "/opt/simc iterations=10 p.simc");
        assert_eq!(query_string("/opt/simc", &[]), "/opt/simc");
    }

    #[test]
    fn captured_streams() {
        assert_eq!(captured(b""), None);
        assert_eq!(captured(b"DPS: 1").as_deref(), Some("DPS: 1"));
        assert_eq!(captured(&[0x66, 0xff]).as_deref(), Some("f\u{fffd}"));
    }

    #[test]
    fn timed_out_needs_missing_code() {
        let mut record = HistoryRecord {
            query: "simc".into(),
            return_code: None,
            output: None,
            error: Some(format!("{TIMED_OUT} after 5s")),
        };
        assert!(record.timed_out());
        record.return_code = Some(1);
        assert!(!record.timed_out());
    }

    #[test]
    fn serializes_all_fields() {
        let record = HistoryRecord {
            query: "simc a=1".into(),
            return_code: Some(0),
            output: Some("ok".into()),
            error: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["query"], "simc a=1");
        assert_eq!(json["return_code"], 0);
        assert!(json["error"].is_null());
    }
}
