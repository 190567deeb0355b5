//! Function definitions offered to the model.

use serde::Serialize;

use super::json::{Fields, JsonObject, JsonValue};
use super::WireFormat;
use crate::error::DecodeResult;

/// `description` is always written, as `null` when absent. `parameters` is
/// omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: Option<String>,
    /// Parameter schema, conventionally a JSON Schema object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<JsonObject>,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

impl WireFormat for FunctionSpec {
    fn decode(value: &JsonValue) -> DecodeResult<Self> {
        let fields = Fields::of(value, "")?;
        Ok(Self {
            name: fields.required_str("name")?.to_string(),
            description: fields.optional_string("description")?,
            parameters: fields.optional_object("parameters")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use serde_json::json;

    #[test]
    fn test_description_always_present() {
        let encoded = FunctionSpec::new("ping").encode();
        assert_eq!(encoded, json!({"name": "ping", "description": null}));
        assert_eq!(FunctionSpec::decode(&encoded).unwrap(), FunctionSpec::new("ping"));
    }

    #[test]
    fn test_deep_parameters_round_trip() {
        let schema = json!({
            "type": "object",
            "properties": {
                "filters": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"tags": {"type": "array", "items": [{"enum": ["a", 1, 2.5, true, null]}]}}
                    }
                }
            },
            "required": ["filters"]
        });
        let spec = FunctionSpec::new("search")
            .with_description("Search the index")
            .with_parameters(schema.as_object().cloned().unwrap());
        let encoded = spec.encode();
        assert_eq!(encoded["parameters"], schema);
        assert_eq!(FunctionSpec::decode(&encoded).unwrap(), spec);
    }

    #[test]
    fn test_parameters_must_be_object() {
        let err = FunctionSpec::decode(&json!({"name": "f", "parameters": "schema"})).unwrap_err();
        assert_eq!(err, DecodeError::type_mismatch("parameters", "object"));
    }
}
