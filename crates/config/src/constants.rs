//! Centralized constants for the configuration loader.

/// `tracing` target used for every event emitted by the loader.
pub const LOG_TARGET: &str = "conf";

/// Separator between the type identifier and the configuration name in cache keys.
pub const CACHE_KEY_SEPARATOR: char = ':';

/// Separator used when rendering a field path (`a.b.0.c`).
pub const FIELD_PATH_SEPARATOR: &str = ".";

/// Separator between rendered field errors in a wrapped error message.
pub const FIELD_ERROR_SEPARATOR: &str = "; ";

/// Environment variable that disables `.env` loading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";
