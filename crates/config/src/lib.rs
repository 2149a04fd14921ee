//! Typed configuration objects loaded from the environment or layered data files.
//!
//! A [`ConfigLoader`] resolves a configuration name either from an environment
//! variable of the same name holding a JSON object, or by merging
//! `<name>.json`/`<name>.toml` files across an ordered list of directories.
//! The raw data is turned into a typed instance through the type's
//! [`FromRaw`] implementation, validated, and cached per (type, name).

pub mod cache;
pub mod constants;
mod loader;
pub mod types;

pub use cache::{CacheKey, ConfigCache};
pub use loader::{
    ConfigError, ConfigLoader, EnvDocumentError, EnvSource, FileFormat, Lookup, ProcessEnv,
    ResolveError, default_config_dir, env_var_or_none, merge_from_directories,
    parse_env_document, read_data_file,
};
pub use types::{FieldError, FieldErrors, FromRaw, PathSegment, RawConfig, Validity};
