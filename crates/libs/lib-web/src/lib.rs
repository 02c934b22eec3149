//! # Web Library
//!
//! The HTTP side of the CRM backend: request identity stamping, the auth
//! dispatcher, response envelopes and error translation, plus the handlers
//! and server wiring built on them.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use server::{create_router, start_server, AppState, ServerConfig};
