//! Recovery file written when simc cannot be launched.
//!
//! The file lists the configured arguments one per line so the run can be
//! replayed by hand (`simc recovery.simc`).

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::runner::error::RunnerError;

pub const PROJECT_URL: &str = "https://github.com/simcminmax/simcrunner";

/// Render the recovery file contents.
pub fn render_recovery(tokens: &[String], generated_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "# Generated by simcrunner {}\n# {}\n# {}\n",
        env!("CARGO_PKG_VERSION"),
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        PROJECT_URL,
    );
    for token in tokens {
        out.push_str(token);
        out.push('\n');
    }
    out
}

/// Write `tokens` to `path`, creating its directory when needed.
pub fn write_recovery_file(path: &Path, tokens: &[String]) -> Result<(), RunnerError> {
    let err = |source| RunnerError::WriteRecovery {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(err)?;
    }
    std::fs::write(path, render_recovery(tokens, Utc::now())).map_err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn header_then_one_token_per_line() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let tokens = vec!["iterations=1000".to_string(), "myprofile.simc".to_string()];
        let text = render_recovery(&tokens, at);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("# Generated by simcrunner "));
        assert_eq!(lines[1], "# 2024-03-01T12:30:00Z");
        assert_eq!(lines[2], format!("# {PROJECT_URL}"));
        assert_eq!(&lines[3..], ["iterations=1000", "myprofile.simc"]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("recover").join("last.simc");

        write_recovery_file(&path, &["a=1".to_string()]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("a=1\n"));
    }
}
