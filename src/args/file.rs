//! File-backed arguments: profile references and result exports.
//!
//! Both node kinds normalize their path by appending a fixed extension when
//! it is missing. Exports also make sure the target directory exists, so simc
//! never fails at the very end of a long simulation because it cannot write.

use std::path::Path;

use crate::args::error::ArgError;

/// Suffix used by simc profile files.
pub const PROFILE_EXTENSION: &str = ".simc";

/// Append `ext` to `path` unless `path` already ends with it.
///
/// The comparison is an exact, case-sensitive suffix match, so applying it
/// twice gives the same result as applying it once.
pub fn normalize_path(path: &str, ext: &str) -> String {
    if path.ends_with(ext) {
        path.to_string()
    } else {
        format!("{path}{ext}")
    }
}

/// Reference to a simc profile file, passed as a bare token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    path: String,
    add_suffix: bool,
}

impl Profile {
    /// Non-UTF-8 bytes in `path` are replaced with U+FFFD, since tokens
    /// are passed to simc as text.
    pub fn new(path: impl AsRef<Path>, add_suffix: bool) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().into_owned(),
            add_suffix,
        }
    }

    /// The path as passed to simc, with `.simc` appended when requested.
    pub fn path(&self) -> String {
        if self.add_suffix {
            normalize_path(&self.path, PROFILE_EXTENSION)
        } else {
            self.path.clone()
        }
    }
}

/// Result formats simc can export to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Json,
    Html,
}

impl ExportKind {
    /// simc option name for this export.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Json => "json2",
            Self::Html => "html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Html => ".html",
        }
    }
}

/// Export directive rendered as `<key>=<path>`, e.g. `json2=out/result.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExport {
    path: String,
    kind: ExportKind,
}

impl FileExport {
    /// Build an export and create the directory it will be written to.
    /// Paths that are not valid UTF-8 are rejected.
    pub fn new(path: impl AsRef<Path>, kind: ExportKind) -> Result<Self, ArgError> {
        let path = path.as_ref();
        let raw = path.to_str().ok_or_else(|| ArgError::NonUtf8Path {
            path: path.to_path_buf(),
        })?;
        let export = Self {
            path: normalize_path(raw, kind.extension()),
            kind,
        };
        export.ensure_dir()?;
        Ok(export)
    }

    pub fn json(path: impl AsRef<Path>) -> Result<Self, ArgError> {
        Self::new(path, ExportKind::Json)
    }

    pub fn html(path: impl AsRef<Path>) -> Result<Self, ArgError> {
        Self::new(path, ExportKind::Html)
    }

    pub fn kind(&self) -> ExportKind {
        self.kind
    }

    /// Normalized target path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Create the parent directory of the target. Safe to call repeatedly.
    pub fn ensure_dir(&self) -> Result<(), ArgError> {
        let Some(dir) = Path::new(&self.path).parent() else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(());
        }
        tracing::debug!(dir = %dir.display(), "Creating export directory");
        std::fs::create_dir_all(dir).map_err(|source| ArgError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    pub fn token(&self) -> String {
        format!("{}={}", self.kind.key(), self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_missing_extension() {
        assert_eq!(normalize_path("result", ".json"), "result.json");
        assert_eq!(normalize_path("result.json", ".json"), "result.json");
    }

    #[test]
    fn normalize_is_case_sensitive() {
        assert_eq!(normalize_path("result.JSON", ".json"), "result.JSON.json");
    }

    #[test]
    fn normalize_is_idempotent() {
        for path in ["", "a", "a.json", "dir/a.jso", "a.json.json", ".json"] {
            let once = normalize_path(path, ".json");
            assert_eq!(normalize_path(&once, ".json"), once);
        }
    }

    #[test]
    fn profile_suffix_is_optional() {
        assert_eq!(Profile::new("myprofile", true).path(), "myprofile.simc");
        assert_eq!(Profile::new("myprofile.simc", true).path(), "myprofile.simc");
        assert_eq!(Profile::new("myprofile", false).path(), "myprofile");
    }

    #[test]
    fn export_creates_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out").join("nested").join("result");

        let export = FileExport::json(&target).unwrap();

        assert!(tmp.path().join("out").join("nested").is_dir());
        assert!(export.path().ends_with("result.json"));
        assert!(export.token().starts_with("json2="));
        // Second call is a no-op.
        export.ensure_dir().unwrap();
    }

    #[test]
    fn export_without_directory_component() {
        let export = FileExport::html("report").unwrap();
        assert_eq!(export.token(), "html=report.html");
    }

    #[cfg(unix)]
    #[test]
    fn export_rejects_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join(OsStr::from_bytes(b"bad\xffdir")).join("result");

        let err = FileExport::json(&target).unwrap_err();

        assert!(matches!(err, ArgError::NonUtf8Path { .. }));
        assert!(!tmp.path().join(OsStr::from_bytes(b"bad\xffdir")).exists());
    }

    #[test]
    fn export_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let err = FileExport::json(blocker.join("result")).unwrap_err();
        assert!(matches!(err, ArgError::CreateDir { .. }));
    }
}
