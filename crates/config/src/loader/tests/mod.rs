//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test directory precedence and file merging through `resolve`.
//! - Test environment precedence and fallback to files.
//! - Test caching, validation failures, and name checks.
//! - Test dotenv loading.
//!
//! Invariants:
//! - Tests that touch process-global state (env vars, cwd) use `serial_test`
//!   and `env_lock()`.
//! - Most tests inject a `HashMap` environment so they need no global state.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::loader::env::EnvSource;
use crate::types::{self, FieldErrors, FromRaw, RawConfig, Validity};


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Write `contents` to `<dir>/<file>`.
pub fn write_file(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).unwrap();
}

/// Environment built from literal pairs.
pub fn env_of<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Environment source that counts lookups.
#[derive(Clone, Default)]
pub struct CountingEnv {
    vars: HashMap<String, String>,
    lookups: Arc<AtomicUsize>,
}

impl CountingEnv {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl EnvSource for CountingEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.vars.get(key).cloned()
    }
}

/// Database settings with field-level validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Database {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
}

fn default_port() -> u16 {
    5432
}

impl FromRaw for Database {
    fn from_raw(raw: RawConfig) -> Result<Self, FieldErrors> {
        types::deserialize(raw)
    }

    fn validate(&self) -> Validity {
        let mut errors = FieldErrors::new();
        if self.host.trim().is_empty() {
            errors.add(["host".into()], "must not be empty");
        }
        if self.port == 0 {
            errors.add(["port".into()], "must be positive");
        }
        Validity::from_errors(errors)
    }
}

/// Free-form settings without validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings(pub RawConfig);

impl FromRaw for Settings {
    fn from_raw(raw: RawConfig) -> Result<Self, FieldErrors> {
        Ok(Settings(raw))
    }
}

/// Always fails validation with two errors.
#[derive(Debug)]
pub struct AlwaysInvalid;

impl FromRaw for AlwaysInvalid {
    fn from_raw(_raw: RawConfig) -> Result<Self, FieldErrors> {
        Ok(AlwaysInvalid)
    }

    fn validate(&self) -> Validity {
        let mut errors = FieldErrors::new();
        errors.add(["a".into()], "required");
        errors.add(["b".into(), "c".into()], "invalid");
        Validity::Invalid(errors)
    }
}
