//! # Authentication Middleware
//!
//! Applied with `route_layer` so it only runs for matched routes. Routes
//! whose matched path is registered as public on the [`AuthDispatcher`]
//! skip authentication; every other request must be accepted by one of the
//! dispatcher's strategies, and the resulting [`Principal`] is inserted
//! into the request extensions for the [`Authenticated`] extractor.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/projects", get(list_projects))
//!     .route_layer(middleware::from_fn_with_state(dispatcher, require_auth));
//! ```
//!
//! [`Principal`]: lib_core::Principal
//! [`Authenticated`]: crate::extractors::Authenticated

use crate::auth::{AuthDispatcher, AuthRequest};
use crate::error::Result;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

pub async fn require_auth(State(dispatcher): State<AuthDispatcher>, mut req: Request, next: Next) -> Result<Response> {
    let route = req.extensions().get::<MatchedPath>().map(|m| m.as_str().to_string());

    if route.as_deref().is_some_and(|r| dispatcher.is_public(r)) {
        debug!("[AUTH] public route {}", route.as_deref().unwrap_or_default());
        return Ok(next.run(req).await);
    }

    let principal = dispatcher
        .authenticate(AuthRequest::new(req.headers(), req.uri()))
        .await
        .inspect_err(|_| warn!(path = %req.uri().path(), "[AUTH] request denied"))?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
