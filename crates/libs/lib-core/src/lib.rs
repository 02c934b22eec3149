//! # Core Library
//!
//! Configuration, the domain error taxonomy, the per-request context store,
//! wire envelope types, validation flattening, and the SQLite store.

pub mod config;
pub mod credential;
pub mod ctx;
pub mod dto;
pub mod error;
pub mod model;
pub mod principal;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use credential::CredentialStore;
pub use ctx::{ContextStore, RequestContext};
pub use error::{AppError, ErrorCode, Result};
pub use model::store::{create_pool, DbPool};
pub use principal::{AuthMethod, Principal};
pub use validation::{FieldViolation, Validate, ViolationTree};
