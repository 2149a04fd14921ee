//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define the errors `ConfigLoader` returns to callers.
//! - Define the underlying resolution failures kept as the error source.
//!
//! Does NOT handle:
//! - Environment values that fail to parse. Those are logged and the loader
//!   falls back to files (see `env.rs`).
//!
//! Invariants:
//! - Every data failure (file, construction, validation) reaches the caller as
//!   `ConfigError::Invalid`, with the original failure as its source.
//! - Programming errors (`InvalidName`) are never wrapped.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::{FieldError, FieldErrors, PathSegment};

/// Errors returned by `ConfigLoader`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration name cannot be used as an environment variable and file name.
    #[error("Invalid configuration name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Reading, constructing, or validating the configuration failed.
    #[error("Config '{name}' must be JSON. Errors: {details}")]
    Invalid {
        name: String,
        details: String,
        #[source]
        source: ResolveError,
    },

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    /// Wrap a resolution failure for configuration `name`.
    pub fn invalid(name: &str, source: ResolveError) -> Self {
        ConfigError::Invalid {
            name: name.to_string(),
            details: source.field_errors().render(),
            source,
        }
    }

    /// Field diagnostics carried by an `Invalid` error.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ConfigError::Invalid { source, .. } => Some(source.field_errors()),
            _ => None,
        }
    }
}

/// A single failed attempt to turn configuration sources into an instance.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {message}")]
    FileParse { path: PathBuf, message: String },

    #[error("Config file at {path} must contain a mapping at the top level, found {found}")]
    FileNotMapping { path: PathBuf, found: &'static str },

    #[error("construction failed: {0}")]
    Construct(#[source] FieldErrors),

    #[error("validation failed: {0}")]
    Validate(#[source] FieldErrors),
}

impl ResolveError {
    /// Diagnostics as field errors. File failures are reported against the file path.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ResolveError::Construct(errors) | ResolveError::Validate(errors) => errors.clone(),
            ResolveError::FileRead { path, source } => {
                file_error(path, format!("cannot read file: {source}"))
            }
            ResolveError::FileParse { path, message } => file_error(path, message.clone()),
            ResolveError::FileNotMapping { path, found } => {
                file_error(path, format!("expected a mapping, found {found}"))
            }
        }
    }
}

fn file_error(path: &std::path::Path, message: String) -> FieldErrors {
    FieldErrors::single(FieldError::new(
        [PathSegment::Key(path.display().to_string())],
        message,
    ))
}
