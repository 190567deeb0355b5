//! The top-level chat-completion request and its encode/decode algorithm.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::json::{Fields, JsonValue};
use super::{DecodePolicy, FunctionCallDirective, FunctionSpec, Message, WireFormat};
use crate::error::{DecodeError, DecodeResult};

/// Model identifier. Opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Model {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Model {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for Model {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Model {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A chat-completion request.
///
/// Sampling fields are carried as given; conventional ranges are not
/// enforced here (see [`crate::validate`]). A non-finite float has no JSON
/// form and is left out of the wire document like an absent one.
///
/// The `stream` flag is not part of the constructor: the component that
/// dispatches the request sets it with [`ChatRequest::set_stream`] or
/// [`ChatRequest::into_streaming`].
///
/// Field order is wire order. `model`, `messages` and `stream` are always
/// written; `function_call` is also skipped for [`FunctionCallDirective::None`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: Model,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionSpec>>,
    #[serde(skip_serializing_if = "FunctionCallDirective::is_omitted")]
    pub function_call: Option<FunctionCallDirective>,
    #[serde(skip_serializing_if = "is_absent_or_non_finite")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "is_absent_or_non_finite")]
    pub top_p: Option<f64>,
    /// Number of choices to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u64>,
    stream: bool,
    /// Up to four stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "is_absent_or_non_finite")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "is_absent_or_non_finite")]
    pub frequency_penalty: Option<f64>,
    /// Token id (as a string) to bias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<BTreeMap<String, i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

fn is_absent_or_non_finite(value: &Option<f64>) -> bool {
    !value.is_some_and(f64::is_finite)
}

impl ChatRequest {
    pub fn new(model: impl Into<Model>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            functions: None,
            function_call: None,
            temperature: None,
            top_p: None,
            n: None,
            stream: false,
            stop: None,
            max_tokens: None,
            presence_penalty: None,
            frequency_penalty: None,
            logit_bias: None,
            user: None,
        }
    }

    #[must_use]
    pub fn with_functions(mut self, functions: Vec<FunctionSpec>) -> Self {
        self.functions = Some(functions);
        self
    }

    #[must_use]
    pub fn with_function_call(mut self, directive: FunctionCallDirective) -> Self {
        self.function_call = Some(directive);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    #[must_use]
    pub fn with_n(mut self, n: u64) -> Self {
        self.n = Some(n);
        self
    }

    #[must_use]
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    #[must_use]
    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    #[must_use]
    pub fn with_logit_bias(mut self, logit_bias: BTreeMap<String, i64>) -> Self {
        self.logit_bias = Some(logit_bias);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    pub fn set_stream(&mut self, stream: bool) {
        self.stream = stream;
    }

    #[must_use]
    pub fn into_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Decode under an explicit [`DecodePolicy`].
    ///
    /// # Errors
    /// `MissingRequiredField` for an absent `model`/`messages` (and, when
    /// strict, `stream`/`function_call`), `TypeMismatch` for a wrongly typed
    /// field, and directive errors from the `function_call` value.
    pub fn decode_with(value: &JsonValue, policy: DecodePolicy) -> DecodeResult<Self> {
        let fields = Fields::of(value, "")?;

        let model = Model::new(fields.required_str("model")?);

        let messages = fields
            .required_array("messages")?
            .iter()
            .enumerate()
            .map(|(i, m)| {
                Message::decode(m).map_err(|e| e.within(&format!("[{i}]")).within("messages"))
            })
            .collect::<DecodeResult<Vec<_>>>()?;

        let functions = match fields.get("functions") {
            None => None,
            Some(value) => Some(
                value
                    .as_array()
                    .ok_or_else(|| DecodeError::type_mismatch("functions", "array"))?
                    .iter()
                    .enumerate()
                    .map(|(i, f)| {
                        FunctionSpec::decode(f)
                            .map_err(|e| e.within(&format!("[{i}]")).within("functions"))
                    })
                    .collect::<DecodeResult<Vec<_>>>()?,
            ),
        };

        let function_call = match policy {
            DecodePolicy::Strict => Some(fields.required("function_call")?),
            DecodePolicy::Lenient => fields.get("function_call"),
        }
        .map(|v| FunctionCallDirective::from_wire(v).map_err(|e| e.within("function_call")))
        .transpose()?;

        let stream = match policy {
            DecodePolicy::Strict => fields.required_bool("stream")?,
            DecodePolicy::Lenient => fields.optional_bool("stream")?.unwrap_or_else(|| {
                tracing::debug!(model = %model, "request has no stream flag, assuming false");
                false
            }),
        };

        Ok(Self {
            model,
            messages,
            functions,
            function_call,
            temperature: fields.optional_f64("temperature")?,
            top_p: fields.optional_f64("top_p")?,
            n: fields.optional_u64("n")?,
            stream,
            stop: fields.optional_string_list("stop")?,
            max_tokens: fields.optional_u64("max_tokens")?,
            presence_penalty: fields.optional_f64("presence_penalty")?,
            frequency_penalty: fields.optional_f64("frequency_penalty")?,
            logit_bias: decode_logit_bias(&fields)?,
            user: fields.optional_string("user")?,
        })
    }
}

fn decode_logit_bias(fields: &Fields<'_>) -> DecodeResult<Option<BTreeMap<String, i64>>> {
    let Some(obj) = fields.optional_object("logit_bias")? else {
        return Ok(None);
    };
    obj.iter()
        .map(|(token, bias)| {
            bias.as_i64()
                .map(|b| (token.clone(), b))
                .ok_or_else(|| DecodeError::type_mismatch(format!("logit_bias.{token}"), "integer"))
        })
        .collect::<DecodeResult<BTreeMap<_, _>>>()
        .map(Some)
}

impl WireFormat for ChatRequest {
    /// Decode with [`DecodePolicy::Lenient`].
    fn decode(value: &JsonValue) -> DecodeResult<Self> {
        Self::decode_with(value, DecodePolicy::Lenient)
    }
}
