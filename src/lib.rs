pub mod chat;
pub mod config;
pub mod error;
pub mod input;
pub mod validate;

pub use chat::{
    decode_request, decode_request_with, encode_request, ChatRequest, DecodePolicy,
    FunctionCallDirective, FunctionCallResult, FunctionSpec, JsonObject, JsonValue, Message,
    Model, Role, WireFormat,
};
pub use config::CodecConfig;
pub use error::{DecodeError, DecodeErrorKind, DecodeResult, Error, Result};
pub use input::read_request;
