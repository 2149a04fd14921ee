//! Configuration loader for environment variables and data files.
//!
//! Responsibilities:
//! - Resolve a named configuration from an environment JSON document or from
//!   `<name>.<ext>` files merged across ordered search directories.
//! - Materialize the raw data into a typed, validated, cached instance.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Construction and validation rules of configuration types (see `types`).
//! - Cache storage (see `cache`).
//!
//! Invariants / Assumptions:
//! - A usable environment document takes precedence over data files.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;
mod files;
mod paths;

#[cfg(test)]
mod tests;

pub use builder::{ConfigLoader, Lookup};
pub use env::{EnvDocumentError, EnvSource, ProcessEnv, env_var_or_none, parse_env_document};
pub use error::{ConfigError, ResolveError};
pub use files::{FileFormat, merge_from_directories, read_data_file};
pub use paths::default_config_dir;
