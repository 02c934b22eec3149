//! # Request Context
//!
//! One [`RequestContext`] per in-flight request, held in tokio task-local
//! storage. The request stamping middleware opens the scope with
//! [`ContextStore::scope`]; anything awaited inside that future, however
//! deep, reads it back with [`ContextStore::get`] without the value being
//! threaded through signatures.
//!
//! Task-local values do not follow `tokio::spawn`. Work handed to another
//! task must go through [`ContextStore::spawn`], which re-enters a copy of
//! the current context in the new task.
//!
//! Reads outside any scope never fail: the accessors fall back to
//! `"unknown"` and the current time.

use chrono::{DateTime, Utc};
use lib_utils::now_utc;
use serde::Serialize;
use std::future::Future;
use tokio::task::JoinHandle;

pub const UNKNOWN: &str = "unknown";

/// Correlation data captured once when a request enters the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub request_id: String,
    pub path: String,
    pub method: String,
    pub client_ip: String,
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        client_ip: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            path: path.into(),
            method: method.into(),
            client_ip: client_ip.into(),
            timestamp: now_utc(),
        }
    }
}

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// Accessors for the task-scoped request context.
pub struct ContextStore;

impl ContextStore {
    /// Run `fut` with `ctx` as the current request context.
    ///
    /// Scopes nest: an inner scope shadows the outer one until it completes.
    pub async fn scope<F>(ctx: RequestContext, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(ctx, fut).await
    }

    /// Synchronous variant of [`ContextStore::scope`].
    pub fn sync_scope<R>(ctx: RequestContext, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(ctx, f)
    }

    /// The current request context, if called inside a scope.
    pub fn get() -> Option<RequestContext> {
        CURRENT.try_with(Clone::clone).ok()
    }

    pub fn request_id() -> Option<String> {
        CURRENT.try_with(|ctx| ctx.request_id.clone()).ok()
    }

    /// Current request id, or `"unknown"` outside a request.
    pub fn request_id_or_unknown() -> String {
        Self::request_id().unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn path() -> Option<String> {
        CURRENT.try_with(|ctx| ctx.path.clone()).ok()
    }

    /// Request timestamp, or now outside a request.
    pub fn timestamp() -> DateTime<Utc> {
        CURRENT.try_with(|ctx| ctx.timestamp).unwrap_or_else(|_| now_utc())
    }

    /// Spawn `fut` on the runtime, carrying the current context (if any) into the new task.
    pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match Self::get() {
            Some(ctx) => tokio::spawn(CURRENT.scope(ctx, fut)),
            None => tokio::spawn(fut),
        }
    }
}
