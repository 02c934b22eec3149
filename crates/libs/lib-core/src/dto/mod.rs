//! # Data Transfer Objects (DTOs)
//!
//! Wire types: the response envelope every endpoint answers with,
//! pagination, and the request/response bodies of each resource.

pub mod api_key;
pub mod auth;
pub mod contact;
pub mod envelope;
pub mod pagination;
pub mod project;

pub use api_key::*;
pub use auth::*;
pub use contact::*;
pub use envelope::*;
pub use pagination::*;
pub use project::*;
