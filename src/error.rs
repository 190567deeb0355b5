//! Error types for decoding and for the surrounding tooling.

use std::fmt;

use thiserror::Error;

/// A typed failure while decoding a wire document into the chat model.
///
/// Field names are dotted paths from the document root, e.g.
/// `messages[1].function_call.name`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Malformed JSON: {message}")]
    MalformedJson { message: String },

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: String },

    #[error("Type mismatch at {field}: expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("Malformed function_call directive: {reason}")]
    MalformedDirective { reason: String },

    #[error("Unrecognized function_call directive shape: single key '{key}'")]
    UnrecognizedDirectiveShape { key: String },
}

/// Fieldless discriminant of [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    MalformedJson,
    MissingRequiredField,
    TypeMismatch,
    MalformedDirective,
    UnrecognizedDirectiveShape,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedJson => "MalformedJSON",
            Self::MissingRequiredField => "MissingRequiredField",
            Self::TypeMismatch => "TypeMismatch",
            Self::MalformedDirective => "MalformedDirective",
            Self::UnrecognizedDirectiveShape => "UnrecognizedDirectiveShape",
        };
        f.write_str(name)
    }
}

impl DecodeError {
    pub fn malformed_json(msg: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: msg.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    pub fn malformed_directive(reason: impl Into<String>) -> Self {
        Self::MalformedDirective {
            reason: reason.into(),
        }
    }

    pub fn unrecognized_directive(key: impl Into<String>) -> Self {
        Self::UnrecognizedDirectiveShape { key: key.into() }
    }

    #[must_use]
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::MalformedJson { .. } => DecodeErrorKind::MalformedJson,
            Self::MissingRequiredField { .. } => DecodeErrorKind::MissingRequiredField,
            Self::TypeMismatch { .. } => DecodeErrorKind::TypeMismatch,
            Self::MalformedDirective { .. } => DecodeErrorKind::MalformedDirective,
            Self::UnrecognizedDirectiveShape { .. } => {
                DecodeErrorKind::UnrecognizedDirectiveShape
            }
        }
    }

    /// Prefix the field path with the enclosing field, as the error bubbles
    /// out of a nested decode.
    #[must_use]
    pub fn within(self, parent: &str) -> Self {
        match self {
            Self::MissingRequiredField { field } => Self::MissingRequiredField {
                field: join_path(parent, &field),
            },
            Self::TypeMismatch { field, expected } => Self::TypeMismatch {
                field: join_path(parent, &field),
                expected,
            },
            other => other,
        }
    }
}

fn join_path(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else if parent.is_empty() || child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_builds_dotted_paths() {
        let err = DecodeError::missing("name")
            .within("function_call")
            .within("[2]")
            .within("messages");
        assert_eq!(
            err,
            DecodeError::missing("messages[2].function_call.name")
        );
    }

    #[test]
    fn test_within_leaves_directive_errors_alone() {
        let err = DecodeError::unrecognized_directive("bogus").within("function_call");
        assert_eq!(err, DecodeError::unrecognized_directive("bogus"));
        assert_eq!(err.kind(), DecodeErrorKind::UnrecognizedDirectiveShape);
    }

    #[test]
    fn test_kind_display_uses_wire_names() {
        assert_eq!(DecodeErrorKind::MalformedJson.to_string(), "MalformedJSON");
        assert_eq!(
            DecodeError::type_mismatch("n", "unsigned integer").to_string(),
            "Type mismatch at n: expected unsigned integer"
        );
    }
}
