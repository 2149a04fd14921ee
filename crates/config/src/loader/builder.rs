//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` over an ordered list of search directories.
//! - Resolve a named configuration into a typed, validated, cached instance.
//! - Choose between the environment document and the merged data files.
//!
//! Does NOT handle:
//! - Environment variable parsing details (delegated to env.rs).
//! - Reading and merging data files (delegated to files.rs).
//! - Constructing or validating instances (delegated to the type's `FromRaw` impl).
//!
//! Invariants / Assumptions:
//! - Later directories take precedence over earlier ones.
//! - A valid environment document takes precedence over files; an invalid one
//!   is logged and ignored.
//! - Once a (type, name) resolution succeeds, later calls return the cached
//!   instance without touching the environment or the filesystem.
//! - Failed resolutions never populate the cache.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::env::{EnvSource, ProcessEnv, parse_env_document};
use super::error::{ConfigError, ResolveError};
use super::files::{FileFormat, merge_from_directories};
use super::paths::default_config_dir;
use crate::cache::{CacheKey, ConfigCache};
use crate::constants::{DOTENV_DISABLED_VAR, LOG_TARGET};
use crate::types::{FromRaw, RawConfig, Validity};

/// Where `resolve_with` looks for configuration data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lookup {
    /// Use the environment variable named after the configuration when it holds
    /// a JSON object, otherwise the data files.
    #[default]
    EnvFirst,
    /// Only consult the data files.
    FilesOnly,
}

/// Loads typed configuration objects from the environment or layered data files.
///
/// ```no_run
/// use conf_loader::{ConfigLoader, FieldErrors, FromRaw, RawConfig, types};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Database {
///     host: String,
///     port: u16,
/// }
///
/// impl FromRaw for Database {
///     fn from_raw(raw: RawConfig) -> Result<Self, FieldErrors> {
///         types::deserialize(raw)
///     }
/// }
///
/// let loader = ConfigLoader::new(["/etc/app", "/etc/app/local"]);
/// let db = loader.resolve::<Database>("database")?;
/// println!("{}:{}", db.host, db.port);
/// # Ok::<(), conf_loader::ConfigError>(())
/// ```
///
/// Resolution requires the construction capability at compile time:
///
/// ```compile_fail
/// use conf_loader::ConfigLoader;
///
/// struct NotConfig;
///
/// let loader = ConfigLoader::new(Vec::<std::path::PathBuf>::new());
/// let _ = loader.resolve::<NotConfig>("anything");
/// ```
pub struct ConfigLoader {
    directories: Vec<PathBuf>,
    format: FileFormat,
    env: Arc<dyn EnvSource>,
    cache: Arc<ConfigCache>,
}

impl ConfigLoader {
    /// Create a loader over `directories`, in precedence order (last wins).
    ///
    /// No I/O is performed. The loader reads the process environment, uses
    /// JSON data files, and owns a fresh cache.
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            format: FileFormat::default(),
            env: Arc::new(ProcessEnv),
            cache: Arc::new(ConfigCache::new()),
        }
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(target: LOG_TARGET, path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Append a directory with the highest precedence so far.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Append the per-user configuration directory of `app` (see `default_config_dir`).
    pub fn with_user_config_dir(self, app: &str) -> Result<Self, ConfigError> {
        let dir = default_config_dir(app)?;
        Ok(self.with_directory(dir))
    }

    /// Use `format` for the per-directory data files.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    /// Read environment values from `env` instead of the process environment.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Store instances in `cache`, which may be shared with other loaders.
    ///
    /// Loaders sharing a cache share entries by (type, name) regardless of
    /// their directories.
    pub fn with_cache(mut self, cache: Arc<ConfigCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn cache(&self) -> &Arc<ConfigCache> {
        &self.cache
    }

    /// Resolve configuration `name` as `T`, checking the environment first.
    pub fn resolve<T: FromRaw>(&self, name: &str) -> Result<Arc<T>, ConfigError> {
        self.resolve_with(name, Lookup::EnvFirst)
    }

    /// Resolve configuration `name` as `T`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidName` if `name` cannot be used as an environment
    ///   variable and relative file stem. Names may contain `/` to reach a
    ///   sub-directory (`db/primary`), but must not be absolute, contain empty,
    ///   `.` or `..` segments, `\\`, NUL or `=`.
    /// - `ConfigError::Invalid` if a data file cannot be read or parsed, or the
    ///   type rejects the data during construction or validation.
    pub fn resolve_with<T: FromRaw>(
        &self,
        name: &str,
        lookup: Lookup,
    ) -> Result<Arc<T>, ConfigError> {
        validate_name(name)?;

        if let Some(cached) = self.cache.get::<T>(name) {
            tracing::trace!(
                target: LOG_TARGET,
                key = %CacheKey::of::<T>(name),
                "Config cache hit"
            );
            return Ok(cached);
        }

        let instance = self
            .raw_data(name, lookup)
            .and_then(materialize::<T>)
            .map_err(|e| ConfigError::invalid(name, e))?;

        tracing::debug!(target: LOG_TARGET, key = %CacheKey::of::<T>(name), "Config resolved");
        Ok(self.cache.insert(name, Arc::new(instance)))
    }

    /// Raw data for `name`: the environment document if usable, otherwise the merged files.
    fn raw_data(&self, name: &str, lookup: Lookup) -> Result<RawConfig, ResolveError> {
        if lookup == Lookup::EnvFirst
            && let Some(value) = self.env.var(name)
        {
            match parse_env_document(&value) {
                Ok(raw) => {
                    tracing::debug!(
                        target: LOG_TARGET,
                        config = name,
                        "Loading config from environment"
                    );
                    return Ok(raw);
                }
                Err(e) => {
                    tracing::warn!(
                        target: LOG_TARGET,
                        config = name,
                        error = %e,
                        "Invalid config in environment, falling back to files"
                    );
                }
            }
        }

        merge_from_directories(&self.directories, name, self.format)
    }
}

/// Construct `T` from raw data and run its validation, if any.
fn materialize<T: FromRaw>(raw: RawConfig) -> Result<T, ResolveError> {
    let instance = T::from_raw(raw).map_err(ResolveError::Construct)?;

    match instance.validate() {
        Validity::Invalid(errors) => Err(ResolveError::Validate(errors)),
        Validity::Valid | Validity::Unchecked => Ok(instance),
    }
}

/// Reject names that are unusable as an environment variable or a relative file stem.
///
/// `/` separates sub-directories, so `db/primary` maps to `<dir>/db/primary.<ext>`.
fn validate_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains(['\0', '=']) {
        Some("must not contain NUL or '='")
    } else if name.contains('\\') {
        Some("must use '/' as the only path separator")
    } else if name.starts_with('/') {
        Some("must be a relative path")
    } else if name.split('/').any(|segment| segment.is_empty()) {
        Some("must not contain empty path segments")
    } else if name.split('/').any(|segment| segment == "." || segment == "..") {
        Some("must not contain relative directory references")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("directories", &self.directories)
            .field("format", &self.format)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
