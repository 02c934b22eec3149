//! # Credential Store
//!
//! The contract the API key strategy uses to check opaque keys. The
//! persistence layer owns the records; the strategy only asks two
//! questions about a presented secret.

use crate::error::Result;
use crate::principal::Principal;
use futures_util::future::BoxFuture;

pub trait CredentialStore: Send + Sync {
    /// `true` when the secret names an existing, active key.
    fn validate<'a>(&'a self, secret: &'a str) -> BoxFuture<'a, Result<bool>>;

    /// Minimal identity tied to an active key, `None` otherwise.
    fn resolve<'a>(&'a self, secret: &'a str) -> BoxFuture<'a, Result<Option<Principal>>>;
}
