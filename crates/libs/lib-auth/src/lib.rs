//! # Authentication Library
//!
//! JWT bearer tokens, password hashing, and opaque API key material.

pub mod apikey;
pub mod pwd;
pub mod token;

// Re-export commonly used types
pub use apikey::{generate_api_key, API_KEY_PREFIX};
pub use pwd::{hash_password, verify_password};
pub use token::{decode_jwt, encode_claims, encode_jwt, Claims};
