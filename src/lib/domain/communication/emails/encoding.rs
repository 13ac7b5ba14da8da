//! Base64 helpers for message bodies and attachments.

use std::borrow::Cow;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::DecodeError;

/// Decodes standard, padded base64. Line breaks are ignored.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let compact = if encoded.contains(['\r', '\n']) {
        Cow::Owned(encoded.replace(['\r', '\n'], ""))
    } else {
        Cow::Borrowed(encoded)
    };

    Ok(STANDARD.decode(compact.as_bytes())?)
}

/// Decodes base64 that must hold UTF-8 text.
pub fn decode_base64_text(encoded: &str) -> Result<String, DecodeError> {
    Ok(String::from_utf8(decode_base64(encoded)?)?)
}

/// Encodes bytes as standard, padded base64.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}
