//! Chat-completion request model and its wire codec.
//!
//! Encoding is plain `serde` serialization of the model types. Decoding goes
//! through [`WireFormat::decode`], a hand-written reader over [`JsonValue`]
//! that reports typed [`crate::DecodeError`]s; the `Deserialize` impls
//! delegate to it. All functions here are pure (no I/O).

pub mod directive;
pub mod function;
pub mod json;
pub mod message;
pub mod request;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::DecodeResult;

pub use directive::FunctionCallDirective;
pub use function::FunctionSpec;
pub use json::{JsonObject, JsonValue};
pub use message::{FunctionCallResult, Message, Role};
pub use request::{ChatRequest, Model};

/// Encode/decode pair between a model type and its JSON wire shape.
pub trait WireFormat: Serialize + Sized {
    /// Build the wire value.
    fn encode(&self) -> JsonValue {
        // Wire types only contain string-keyed maps, so this cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Rebuild the model from its wire value.
    ///
    /// # Errors
    /// Returns a [`crate::DecodeError`] describing the first offending field.
    fn decode(value: &JsonValue) -> DecodeResult<Self>;
}

/// How strictly `ChatRequest` decoding treats `stream` and `function_call`.
///
/// Encoding always writes `stream` and may omit `function_call`, so a
/// strict reader rejects some documents this crate itself produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Missing `stream` decodes as `false`, missing `function_call` as absent.
    #[default]
    Lenient,
    /// Both keys are required; a document without them is rejected.
    Strict,
}

/// Implement `Deserialize` for a type through its `WireFormat` decoder.
macro_rules! deserialize_via_wire_format {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value =
                    <$crate::chat::JsonValue as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::chat::WireFormat>::decode(&value)
                    .map_err(serde::de::Error::custom)
            }
        }
    )+};
}

deserialize_via_wire_format!(
    ChatRequest,
    Message,
    FunctionCallResult,
    FunctionSpec,
    FunctionCallDirective,
);

/// Encode a request into the bytes handed to the transport.
#[must_use]
pub fn encode_request(req: &ChatRequest) -> Bytes {
    // Same reasoning as `WireFormat::encode`: no fallible keys or values.
    let body = serde_json::to_vec(req).unwrap_or_default();
    tracing::debug!(
        model = %req.model,
        messages = req.messages.len(),
        stream = req.is_streaming(),
        bytes = body.len(),
        "encoded chat request"
    );
    Bytes::from(body)
}

/// Decode request bytes with the default (lenient) policy.
///
/// # Errors
/// `MalformedJson` for invalid JSON, otherwise the first field-level error.
pub fn decode_request(bytes: &[u8]) -> DecodeResult<ChatRequest> {
    decode_request_with(bytes, DecodePolicy::default())
}

/// Decode request bytes under an explicit policy.
///
/// # Errors
/// `MalformedJson` for invalid JSON, otherwise the first field-level error.
pub fn decode_request_with(bytes: &[u8], policy: DecodePolicy) -> DecodeResult<ChatRequest> {
    let value = json::decode_json(bytes)?;
    let req = ChatRequest::decode_with(&value, policy)?;
    tracing::debug!(
        model = %req.model,
        messages = req.messages.len(),
        ?policy,
        "decoded chat request"
    );
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    #[test]
    fn test_serde_json_round_trip() {
        let req = ChatRequest::new("gpt-x", vec![Message::user("hi")])
            .with_function_call(FunctionCallDirective::Auto);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["function_call"], "auto");
        assert_eq!(value["stream"], false);

        let back: ChatRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_serde_error_carries_decode_message() {
        let err = serde_json::from_str::<FunctionCallDirective>(r#"{"bogus": {}}"#).unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_encode_request_matches_encode() {
        let req = ChatRequest::new("gpt-x", vec![Message::user("hi")])
            .with_function_call(FunctionCallDirective::named("lookup"));
        let bytes = encode_request(&req);
        let value: JsonValue = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, req.encode());
    }

    #[test]
    fn test_decode_request_policy_switch() {
        let body = br#"{"model": "gpt-x", "messages": [{"role": "user", "content": "hi"}]}"#;
        let lenient = decode_request(body).unwrap();
        assert!(!lenient.is_streaming());
        assert_eq!(lenient.function_call, None);

        let err = decode_request_with(body, DecodePolicy::Strict).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MissingRequiredField);
    }

    #[test]
    fn test_policy_parses_lowercase() {
        let policy: DecodePolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(policy, DecodePolicy::Strict);
    }
}
