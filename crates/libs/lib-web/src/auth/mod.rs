//! # Request Authentication
//!
//! An [`AuthDispatcher`] holds an ordered list of [`AuthStrategy`]s built
//! at startup. Each request is offered to the strategies in order; the
//! first [`Principal`](lib_core::Principal) returned wins and the rest are
//! never consulted. When every strategy fails the request is denied with a
//! single `AUTHENTICATION_ERROR`, whatever the individual reasons were.
//!
//! Strategies shipped here:
//!
//! - [`BearerStrategy`]: `Authorization: Bearer <jwt>`
//! - [`ApiKeyStrategy`]: `x-api-key`, then `?api_key=`, then `Authorization: ApiKey <key>`

pub mod api_key;
pub mod bearer;
pub mod dispatcher;
pub mod strategy;

pub use api_key::ApiKeyStrategy;
pub use bearer::BearerStrategy;
pub use dispatcher::AuthDispatcher;
pub use strategy::{AuthFailure, AuthRequest, AuthStrategy};
