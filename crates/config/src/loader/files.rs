//! Data file loading for configuration.
//!
//! Responsibilities:
//! - Describe the supported data file formats and their extensions.
//! - Read `<dir>/<name>.<ext>` from each search directory and merge the results.
//!
//! Does NOT handle:
//! - Environment variables (see env.rs).
//! - Constructing typed instances (see builder.rs).
//!
//! Invariants:
//! - Directories are visited in order; later files overwrite earlier keys.
//! - Keys only present in earlier files are preserved.
//! - Merging is shallow: a nested mapping is replaced wholesale, not merged.
//! - A missing file is skipped; a present but unreadable or malformed file is an error.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::ResolveError;
use crate::constants::LOG_TARGET;
use crate::types::{RawConfig, merge_shallow, value_kind};

/// Format of the per-directory configuration data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    /// `<name>.json`
    #[default]
    Json,
    /// `<name>.toml`
    Toml,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Toml => "toml",
        }
    }

    /// Path of the data file for `name` inside `dir`.
    pub fn file_path(self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.{}", self.extension()))
    }

    /// Parse file contents into a JSON value tree.
    fn parse(self, contents: &str) -> Result<Value, String> {
        match self {
            FileFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Read and parse one data file, requiring a mapping at the top level.
pub fn read_data_file(path: &Path, format: FileFormat) -> Result<RawConfig, ResolveError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ResolveError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    match format.parse(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ResolveError::FileNotMapping {
            path: path.to_path_buf(),
            found: value_kind(&other),
        }),
        Err(message) => Err(ResolveError::FileParse {
            path: path.to_path_buf(),
            message,
        }),
    }
}

/// Merge `<dir>/<name>.<ext>` across `directories`, later directories winning.
///
/// Returns an empty mapping when no directory holds the file.
pub fn merge_from_directories(
    directories: &[PathBuf],
    name: &str,
    format: FileFormat,
) -> Result<RawConfig, ResolveError> {
    let mut merged = RawConfig::new();

    for dir in directories {
        let path = format.file_path(dir, name);
        if !path.is_file() {
            tracing::trace!(target: LOG_TARGET, path = %path.display(), "No config file in directory");
            continue;
        }

        let data = read_data_file(&path, format)?;
        tracing::debug!(
            target: LOG_TARGET,
            path = %path.display(),
            keys = data.len(),
            "Merging config file"
        );
        merge_shallow(&mut merged, data);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, contents: &str) {
        fs::write(dir.join(file), contents).unwrap();
    }

    #[test]
    fn test_file_path_uses_extension() {
        let dir = Path::new("/etc/app");
        assert_eq!(
            FileFormat::Json.file_path(dir, "db"),
            PathBuf::from("/etc/app/db.json")
        );
        assert_eq!(
            FileFormat::Toml.file_path(dir, "db"),
            PathBuf::from("/etc/app/db.toml")
        );
    }

    #[test]
    fn test_later_directory_wins_and_earlier_keys_are_kept() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(a.path(), "db.json", r#"{"host": "a-host", "user": "admin"}"#);
        write(b.path(), "db.json", r#"{"host": "b-host"}"#);

        let merged = merge_from_directories(
            &[a.path().to_path_buf(), b.path().to_path_buf()],
            "db",
            FileFormat::Json,
        )
        .unwrap();

        assert_eq!(
            Value::Object(merged),
            json!({"host": "b-host", "user": "admin"})
        );
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(b.path(), "db.json", r#"{"port": 1}"#);

        let merged = merge_from_directories(
            &[
                a.path().to_path_buf(),
                a.path().join("does-not-exist"),
                b.path().to_path_buf(),
            ],
            "db",
            FileFormat::Json,
        )
        .unwrap();
        assert_eq!(Value::Object(merged), json!({"port": 1}));
    }

    #[test]
    fn test_no_files_yields_empty_mapping() {
        let a = TempDir::new().unwrap();
        let merged =
            merge_from_directories(&[a.path().to_path_buf()], "db", FileFormat::Json).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_toml_files_merge() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(a.path(), "queue.toml", "name = \"jobs\"\nworkers = 2\n");
        write(b.path(), "queue.toml", "workers = 8\n");

        let merged = merge_from_directories(
            &[a.path().to_path_buf(), b.path().to_path_buf()],
            "queue",
            FileFormat::Toml,
        )
        .unwrap();
        assert_eq!(Value::Object(merged), json!({"name": "jobs", "workers": 8}));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let a = TempDir::new().unwrap();
        write(a.path(), "db.json", "{oops");

        let err = merge_from_directories(&[a.path().to_path_buf()], "db", FileFormat::Json)
            .unwrap_err();
        assert!(matches!(err, ResolveError::FileParse { .. }), "got {err:?}");
    }

    #[test]
    fn test_non_mapping_file_is_rejected() {
        let a = TempDir::new().unwrap();
        write(a.path(), "db.json", "[1, 2, 3]");

        let err = read_data_file(&a.path().join("db.json"), FileFormat::Json).unwrap_err();
        match err {
            ResolveError::FileNotMapping { found, .. } => assert_eq!(found, "array"),
            other => panic!("expected FileNotMapping, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_named_like_file_is_skipped() {
        let a = TempDir::new().unwrap();
        fs::create_dir(a.path().join("db.json")).unwrap();

        let merged =
            merge_from_directories(&[a.path().to_path_buf()], "db", FileFormat::Json).unwrap();
        assert!(merged.is_empty());
    }
}
