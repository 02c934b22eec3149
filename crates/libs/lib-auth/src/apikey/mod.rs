//! # API Key Material
//!
//! Opaque keys handed to machine clients. A key is a fixed prefix followed
//! by 32 random bytes in URL-safe base64.

use lib_utils::b64u_encode;
use rand::rngs::OsRng;
use rand::RngCore;

pub const API_KEY_PREFIX: &str = "ak_";

/// Generate a fresh API key secret.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    format!("{API_KEY_PREFIX}{}", b64u_encode(bytes))
}
