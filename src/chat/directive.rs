//! The `function_call` directive: whether, and which, function the model may call.
//!
//! The three cases have three unrelated wire shapes:
//!
//! | case          | wire value inside the request            |
//! |---------------|------------------------------------------|
//! | `None`        | key omitted                              |
//! | `Auto`        | `"auto"`                                 |
//! | `Named(name)` | `{"function": {"name": "<name>"}}`       |
//!
//! Decoding also accepts the object-wrapped `{"auto": ...}` form that shows
//! up in echoed requests.

use serde::{Serialize, Serializer};

use super::json::{JsonObject, JsonValue};
use super::WireFormat;
use crate::error::{DecodeError, DecodeResult};

const AUTO: &str = "auto";
const NONE: &str = "none";
const FUNCTION: &str = "function";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCallDirective {
    /// Do not send the field at all.
    None,
    /// Let the model decide.
    Auto,
    /// Force a call to the named function.
    Named(String),
}

impl FunctionCallDirective {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether a request leaves the `function_call` key out for `directive`.
    #[must_use]
    pub fn is_omitted(directive: &Option<Self>) -> bool {
        matches!(directive, None | Some(Self::None))
    }

    /// Decode the raw value found under `function_call`.
    ///
    /// # Errors
    /// `UnrecognizedDirectiveShape` for a single-key object with an unknown
    /// key, `MalformedDirective` for any other unsupported shape.
    pub fn from_wire(value: &JsonValue) -> DecodeResult<Self> {
        match value {
            JsonValue::String(s) => match s.as_str() {
                AUTO => Ok(Self::Auto),
                NONE => Ok(Self::None),
                other => Err(DecodeError::malformed_directive(format!(
                    "unsupported string value '{other}'"
                ))),
            },
            JsonValue::Object(obj) => Self::from_object(obj),
            other => Err(DecodeError::malformed_directive(format!(
                "expected a string or an object, found {}",
                json_type_name(other)
            ))),
        }
    }

    fn from_object(obj: &JsonObject) -> DecodeResult<Self> {
        let mut keys = obj.iter();
        let (key, inner) = match (keys.next(), keys.next()) {
            (Some(only), None) => only,
            _ => {
                return Err(DecodeError::malformed_directive(format!(
                    "expected exactly one key, found {}",
                    obj.len()
                )))
            }
        };

        match key.as_str() {
            FUNCTION => {
                let name = inner
                    .as_object()
                    .ok_or_else(|| DecodeError::type_mismatch(FUNCTION, "object"))?
                    .get("name")
                    .ok_or_else(|| DecodeError::missing("function.name"))?
                    .as_str()
                    .ok_or_else(|| DecodeError::type_mismatch("function.name", "string"))?;
                Ok(Self::Named(name.to_string()))
            }
            AUTO => Ok(Self::Auto),
            other => Err(DecodeError::unrecognized_directive(other)),
        }
    }
}

#[derive(Serialize)]
struct NamedWire<'a> {
    function: FunctionName<'a>,
}

#[derive(Serialize)]
struct FunctionName<'a> {
    name: &'a str,
}

/// `None` has no wire value of its own and serializes as `null` when written
/// standalone; inside a request the key is skipped instead.
impl Serialize for FunctionCallDirective {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Auto => serializer.serialize_str(AUTO),
            Self::Named(name) => NamedWire {
                function: FunctionName { name },
            }
            .serialize(serializer),
        }
    }
}

impl WireFormat for FunctionCallDirective {
    fn decode(value: &JsonValue) -> DecodeResult<Self> {
        if value.is_null() {
            return Ok(Self::None);
        }
        Self::from_wire(value)
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
