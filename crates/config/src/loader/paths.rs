//! Platform configuration directory helpers.
//!
//! Responsibilities:
//! - Determine the per-user configuration directory for an application.
//! - Use `directories` crate for platform-appropriate paths.
//!
//! Does NOT handle:
//! - File I/O operations.

use std::path::PathBuf;

use super::error::ConfigError;

/// Returns the per-user configuration directory for `app`.
///
/// - Linux: `~/.config/<app>`
/// - macOS: `~/Library/Application Support/<app>`
/// - Windows: `%AppData%\<app>\config`
pub fn default_config_dir(app: &str) -> Result<PathBuf, ConfigError> {
    let proj_dirs = directories::ProjectDirs::from("", "", app).ok_or_else(|| {
        ConfigError::ConfigDirUnavailable(format!(
            "no home directory found while resolving config directory for '{app}'"
        ))
    })?;

    Ok(proj_dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir_matches_expected_project_dirs() {
        let expected = directories::ProjectDirs::from("", "", "conf-loader-test")
            .unwrap()
            .config_dir()
            .to_path_buf();

        let actual = default_config_dir("conf-loader-test").unwrap();
        assert_eq!(actual, expected);
        assert!(actual.to_string_lossy().contains("conf-loader-test"));
    }
}
