//! Reading request documents from files or stdin.

use std::io::Read;
use std::path::Path;

use crate::chat::{decode_request_with, ChatRequest, DecodePolicy};
use crate::error::Result;

/// Read raw bytes from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}

/// Read and decode one request document.
///
/// # Errors
/// [`crate::Error::Io`] if the input cannot be read, [`crate::Error::Decode`]
/// if it is not a valid request under `policy`.
pub fn read_request(path: &Path, policy: DecodePolicy) -> Result<ChatRequest> {
    let bytes = read_input(path)?;
    let req = decode_request_with(&bytes, policy)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read request");
    Ok(req)
}
