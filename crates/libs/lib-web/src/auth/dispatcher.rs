use super::strategy::{AuthRequest, AuthStrategy};
use futures_util::FutureExt;
use lib_core::{AppError, Principal};
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Ordered strategy list plus the routes that skip authentication.
///
/// Cloned into router state; clones share the same strategies.
#[derive(Clone)]
pub struct AuthDispatcher {
    strategies: Arc<[Arc<dyn AuthStrategy>]>,
    public_routes: Arc<HashSet<String>>,
}

impl AuthDispatcher {
    pub fn new(strategies: Vec<Arc<dyn AuthStrategy>>) -> Self {
        Self {
            strategies: strategies.into(),
            public_routes: Arc::default(),
        }
    }

    /// Mark matched-path patterns (e.g. `/api/auth/login`) as public.
    pub fn with_public_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = (*self.public_routes).clone();
        set.extend(routes.into_iter().map(Into::into));
        self.public_routes = Arc::new(set);
        self
    }

    pub fn is_public(&self, route: &str) -> bool {
        self.public_routes.contains(route)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// First strategy to succeed wins. A strategy that panics counts as a failure.
    pub async fn authenticate(&self, req: AuthRequest<'_>) -> Result<Principal, AppError> {
        for strategy in self.strategies.iter() {
            let attempt = AssertUnwindSafe(strategy.try_authenticate(req)).catch_unwind().await;

            match attempt {
                Ok(Ok(principal)) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        subject = %principal.subject_id,
                        "[AUTH] authenticated"
                    );
                    return Ok(principal);
                }
                Ok(Err(reason)) => {
                    tracing::debug!(strategy = strategy.name(), %reason, "[AUTH] strategy declined");
                }
                Err(_) => {
                    tracing::error!(strategy = strategy.name(), "[AUTH] strategy panicked");
                }
            }
        }

        tracing::debug!(path = %req.uri.path(), "[AUTH] no strategy accepted request");
        Err(AppError::Authentication(AUTHENTICATION_REQUIRED.to_string()))
    }
}
