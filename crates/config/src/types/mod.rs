//! Configuration data types and the capabilities configuration types implement.
//!
//! Responsibilities:
//! - Raw (untyped) configuration data and serde-based construction helpers.
//! - The `FromRaw` construction/validation capability.
//! - Field path diagnostics shared by construction and validation.
//!
//! Does NOT handle:
//! - Locating or reading configuration sources (see `loader`).
//! - Caching constructed instances (see `cache`).

mod capability;
mod field;
mod raw;

pub use capability::{FromRaw, Validity};
pub use field::{FieldError, FieldErrors, PathSegment};
pub use raw::{RawConfig, deserialize, merge_shallow};

pub(crate) use raw::value_kind;
