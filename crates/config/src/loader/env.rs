//! Environment variable access and parsing for configuration.
//!
//! Responsibilities:
//! - Abstract the process environment behind `EnvSource` so lookups can be injected.
//! - Parse an environment value as a JSON document holding a mapping.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Deciding what to do when parsing fails (see builder.rs, which logs and
//!   falls back to files).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - `EnvSource` reports a variable as set whenever it exists, even when empty.
//! - `env_var_or_none` treats empty or whitespace-only values as unset and trims
//!   the rest; it is a helper for callers, not the loader's lookup.
//! - A document is accepted only when its top level is a JSON object.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::types::{RawConfig, value_kind};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            // No trimming needed, return original to avoid allocation
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Source of environment values consulted by the loader.
pub trait EnvSource: Send + Sync {
    /// Value of `key` exactly as set, or `None` when unset.
    ///
    /// A set but empty value is `Some("")`, so the loader still parses it and
    /// warns before falling back to files.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
///
/// Non-UTF-8 values are converted lossily rather than treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Why an environment value could not be used as configuration.
#[derive(Error, Debug)]
pub enum EnvDocumentError {
    #[error("{0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Parse an environment value as a JSON object.
pub fn parse_env_document(value: &str) -> Result<RawConfig, EnvDocumentError> {
    match serde_json::from_str::<Value>(value)? {
        Value::Object(map) => Ok(map),
        other => Err(EnvDocumentError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}
