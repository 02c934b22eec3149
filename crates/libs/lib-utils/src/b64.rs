//! # Base64 Encoding/Decoding
//!
//! URL-safe base64 without padding, used for opaque key material.

use base64::{engine::general_purpose, Engine as _};

/// Encode bytes to a URL-safe base64 string (no padding).
pub fn b64u_encode(content: impl AsRef<[u8]>) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(content)
}

/// Decode a URL-safe base64 string to bytes.
pub fn b64u_decode(b64u: &str) -> Result<Vec<u8>, Error> {
    general_purpose::URL_SAFE_NO_PAD
        .decode(b64u)
        .map_err(|_| Error::FailToB64uDecode)
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToB64uDecode,
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
