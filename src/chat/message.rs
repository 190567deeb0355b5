//! One chat turn and the function-call result it may carry.

use serde::{Deserialize, Serialize};

use super::json::{expect_object, Fields, JsonObject, JsonValue};
use super::WireFormat;
use crate::error::{DecodeError, DecodeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    User,
    Function,
}

/// A function invocation emitted by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCallResult {
    pub name: String,
    /// Structured call arguments, always a JSON object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<JsonObject>,
}

impl FunctionCallResult {
    pub fn new(name: impl Into<String>, arguments: Option<JsonObject>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build from the JSON-encoded argument string the server returns.
    ///
    /// # Errors
    /// `MalformedJson` if the text is not JSON, `TypeMismatch` if it is not
    /// an object.
    pub fn from_raw_arguments(name: impl Into<String>, raw: &str) -> DecodeResult<Self> {
        Ok(Self::new(name, Some(parse_arguments(raw)?)))
    }
}

fn parse_arguments(raw: &str) -> DecodeResult<JsonObject> {
    match super::json::decode_json(raw.as_bytes())? {
        JsonValue::Object(obj) => Ok(obj),
        _ => Err(DecodeError::type_mismatch("arguments", "object")),
    }
}

impl WireFormat for FunctionCallResult {
    fn decode(value: &JsonValue) -> DecodeResult<Self> {
        let fields = Fields::of(value, "")?;
        let name = fields.required_str("name")?.to_string();
        let arguments = match fields.get("arguments") {
            None => None,
            Some(JsonValue::Object(obj)) => Some(obj.clone()),
            Some(JsonValue::String(raw)) => Some(parse_arguments(raw)?),
            Some(_) => return Err(DecodeError::type_mismatch("arguments", "object")),
        };
        Ok(Self { name, arguments })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Author name; the transport requires it for `Role::Function`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallResult>,
}

impl Message {
    pub fn new(role: Role, content: Option<String>) -> Self {
        Self {
            role,
            content,
            name: None,
            function_call: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, Some(content.into()))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, Some(content.into()))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Some(content.into()))
    }

    /// An assistant turn that invokes a function instead of replying.
    pub fn assistant_call(call: FunctionCallResult) -> Self {
        Self {
            function_call: Some(call),
            ..Self::new(Role::Assistant, None)
        }
    }

    /// The output of a function, reported back under the function's name.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(Role::Function, Some(content.into()))
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl WireFormat for Message {
    fn decode(value: &JsonValue) -> DecodeResult<Self> {
        let obj = expect_object(value, "")?;
        let fields = Fields::new(obj);

        let role = match fields.get("role") {
            None => return Err(DecodeError::missing("role")),
            // An unknown role carries no usable value, so it counts as missing.
            Some(role @ JsonValue::String(_)) => {
                Role::deserialize(role).map_err(|_| DecodeError::missing("role"))?
            }
            Some(_) => return Err(DecodeError::type_mismatch("role", "string")),
        };

        let function_call = fields
            .get("function_call")
            .map(|v| FunctionCallResult::decode(v).map_err(|e| e.within("function_call")))
            .transpose()?;

        Ok(Self {
            role,
            content: fields.optional_string("content")?,
            name: fields.optional_string("name")?,
            function_call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use serde_json::json;

    #[test]
    fn test_roles_use_lowercase_names() {
        for (role, name) in [
            (Role::System, "system"),
            (Role::Assistant, "assistant"),
            (Role::User, "user"),
            (Role::Function, "function"),
        ] {
            let encoded = Message::new(role, None).encode();
            assert_eq!(encoded, json!({ "role": name }));
            assert_eq!(Message::decode(&encoded).unwrap().role, role);
        }
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let encoded = Message::user("hi").encode();
        assert_eq!(encoded, json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_function_call_message_round_trips() {
        let args = json!({"city": "London", "days": 3, "units": ["c", "f"]});
        let msg = Message::assistant_call(FunctionCallResult::new(
            "get_weather",
            args.as_object().cloned(),
        ));
        let encoded = msg.encode();
        assert_eq!(
            encoded,
            json!({
                "role": "assistant",
                "function_call": {"name": "get_weather", "arguments": args}
            })
        );
        assert_eq!(Message::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn test_function_role_keeps_name() {
        let msg = Message::function("get_weather", "{\"temp\": 21}");
        let encoded = msg.encode();
        assert_eq!(encoded["name"], "get_weather");
        assert_eq!(Message::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn test_string_arguments_are_parsed() {
        let value = json!({
            "role": "assistant",
            "content": null,
            "function_call": {"name": "f", "arguments": "{\"a\": [1, {\"b\": null}]}"}
        });
        let msg = Message::decode(&value).unwrap();
        assert_eq!(msg.content, None);
        let call = msg.function_call.unwrap();
        assert_eq!(
            JsonValue::Object(call.arguments.unwrap()),
            json!({"a": [1, {"b": null}]})
        );
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let value = json!({
            "role": "assistant",
            "function_call": {"name": "f", "arguments": [1, 2]}
        });
        assert_eq!(
            Message::decode(&value).unwrap_err(),
            DecodeError::type_mismatch("function_call.arguments", "object")
        );

        let err = FunctionCallResult::from_raw_arguments("f", "\"just a string\"").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TypeMismatch);
    }

    #[test]
    fn test_missing_or_unknown_role() {
        assert_eq!(
            Message::decode(&json!({"content": "hi"})).unwrap_err(),
            DecodeError::missing("role")
        );
        assert_eq!(
            Message::decode(&json!({"role": "tool", "content": "hi"})).unwrap_err(),
            DecodeError::missing("role")
        );
        assert_eq!(
            Message::decode(&json!({"role": 1})).unwrap_err().kind(),
            DecodeErrorKind::TypeMismatch
        );
    }
}
