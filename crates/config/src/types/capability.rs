//! Capabilities a configuration type provides to the loader.
//!
//! Responsibilities:
//! - Define the construction capability (`FromRaw::from_raw`).
//! - Define the optional validation capability (`FromRaw::validate`) and its outcome.
//!
//! Invariants:
//! - Construction is required: the loader only accepts `T: FromRaw`, so a type
//!   without it is rejected at compile time rather than at runtime.
//! - Validation is optional: the default reports `Validity::Unchecked`.

use super::field::FieldErrors;
use super::raw::RawConfig;

/// Outcome of a configuration type's validation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// The type does not validate its instances.
    Unchecked,
    /// Validation ran and found nothing wrong.
    Valid,
    /// Validation ran and reported errors.
    Invalid(FieldErrors),
}

impl Validity {
    /// `Valid` when `errors` is empty, otherwise `Invalid(errors)`.
    pub fn from_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            Validity::Valid
        } else {
            Validity::Invalid(errors)
        }
    }
}

impl From<Result<(), FieldErrors>> for Validity {
    fn from(result: Result<(), FieldErrors>) -> Self {
        match result {
            Ok(()) => Validity::Valid,
            Err(errors) => Validity::Invalid(errors),
        }
    }
}

/// A configuration type the loader can materialize.
///
/// ```
/// use conf_loader::{FieldErrors, FromRaw, RawConfig, Validity, types};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Cache {
///     ttl_seconds: u64,
/// }
///
/// impl FromRaw for Cache {
///     fn from_raw(raw: RawConfig) -> Result<Self, FieldErrors> {
///         types::deserialize(raw)
///     }
///
///     fn validate(&self) -> Validity {
///         let mut errors = FieldErrors::new();
///         if self.ttl_seconds == 0 {
///             errors.add(["ttl_seconds".into()], "must be positive");
///         }
///         Validity::from_errors(errors)
///     }
/// }
/// ```
pub trait FromRaw: Sized + Send + Sync + 'static {
    /// Build an instance from raw key/value data.
    fn from_raw(raw: RawConfig) -> Result<Self, FieldErrors>;

    /// Check instance-level invariants.
    fn validate(&self) -> Validity {
        Validity::Unchecked
    }
}
