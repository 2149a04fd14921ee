//! Untyped configuration data and helpers for turning it into typed values.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::field::{FieldError, FieldErrors};

/// Raw key/value data prior to construction into a typed instance.
pub type RawConfig = Map<String, Value>;

/// Deserialize raw data into any serde type.
///
/// Meant for `FromRaw::from_raw` implementations that do not need custom
/// construction logic. Deserialization failures are reported as a single
/// root-level field error.
pub fn deserialize<T: DeserializeOwned>(raw: RawConfig) -> Result<T, FieldErrors> {
    serde_json::from_value(Value::Object(raw))
        .map_err(|e| FieldErrors::single(FieldError::root(e.to_string())))
}

/// Shallow-merge `overlay` into `base`: overlay keys replace base keys, base-only keys stay.
pub fn merge_shallow(base: &mut RawConfig, overlay: RawConfig) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

/// Human-readable name of a JSON value's kind, used in diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
