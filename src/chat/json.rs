//! Free-form JSON values and typed field access over JSON objects.
//!
//! `serde_json` is built with `preserve_order`, so an object decoded from a
//! document re-encodes with its keys in document order.

use serde::Deserialize;

use crate::error::{DecodeError, DecodeResult};

/// Arbitrary JSON: null, bool, number, string, array or ordered object.
pub type JsonValue = serde_json::Value;

/// A JSON object with insertion-ordered keys.
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Parse a wire document. Syntax errors become `MalformedJson`.
///
/// Nesting depth is not limited; deep documents grow the stack on demand
/// instead of overflowing it.
pub fn decode_json(bytes: &[u8]) -> DecodeResult<JsonValue> {
    let malformed = |e: serde_json::Error| DecodeError::malformed_json(e.to_string());
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(malformed)?;
    de.end().map_err(malformed)?;
    Ok(value)
}

/// Borrow `value` as an object or fail with `TypeMismatch` at `field`.
pub fn expect_object<'a>(value: &'a JsonValue, field: &str) -> DecodeResult<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::type_mismatch(field, "object"))
}

/// Typed accessors over the keys of one JSON object.
///
/// Optional accessors treat an explicit `null` the same as an absent key.
/// Required accessors report `MissingRequiredField` only for absent keys; a
/// present `null` is a `TypeMismatch`.
pub struct Fields<'a> {
    obj: &'a JsonObject,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(obj: &'a JsonObject) -> Self {
        Self { obj }
    }

    pub fn of(value: &'a JsonValue, field: &str) -> DecodeResult<Self> {
        expect_object(value, field).map(Self::new)
    }

    /// The raw value under `key`, with `null` folded into `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a JsonValue> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    pub fn required(&self, key: &str) -> DecodeResult<&'a JsonValue> {
        self.obj.get(key).ok_or_else(|| DecodeError::missing(key))
    }

    pub fn required_str(&self, key: &str) -> DecodeResult<&'a str> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| DecodeError::type_mismatch(key, "string"))
    }

    pub fn required_bool(&self, key: &str) -> DecodeResult<bool> {
        self.required(key)?
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch(key, "boolean"))
    }

    pub fn required_array(&self, key: &str) -> DecodeResult<&'a Vec<JsonValue>> {
        self.required(key)?
            .as_array()
            .ok_or_else(|| DecodeError::type_mismatch(key, "array"))
    }

    pub fn optional_string(&self, key: &str) -> DecodeResult<Option<String>> {
        self.get(key)
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DecodeError::type_mismatch(key, "string"))
            })
            .transpose()
    }

    pub fn optional_bool(&self, key: &str) -> DecodeResult<Option<bool>> {
        self.get(key)
            .map(|v| {
                v.as_bool()
                    .ok_or_else(|| DecodeError::type_mismatch(key, "boolean"))
            })
            .transpose()
    }

    pub fn optional_f64(&self, key: &str) -> DecodeResult<Option<f64>> {
        self.get(key)
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| DecodeError::type_mismatch(key, "number"))
            })
            .transpose()
    }

    pub fn optional_u64(&self, key: &str) -> DecodeResult<Option<u64>> {
        self.get(key)
            .map(|v| {
                v.as_u64()
                    .ok_or_else(|| DecodeError::type_mismatch(key, "unsigned integer"))
            })
            .transpose()
    }

    pub fn optional_object(&self, key: &str) -> DecodeResult<Option<JsonObject>> {
        self.get(key)
            .map(|v| expect_object(v, key).cloned())
            .transpose()
    }

    pub fn optional_string_list(&self, key: &str) -> DecodeResult<Option<Vec<String>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| DecodeError::type_mismatch(key, "array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| DecodeError::type_mismatch(format!("{key}[{i}]"), "string"))
            })
            .collect::<DecodeResult<Vec<_>>>()
            .map(Some)
    }
}
