//! # HTTP Request Handlers
//!
//! Handlers return plain DTOs (or [`Page`](lib_core::dto::Page)s) and
//! `lib_web::Result`; the response-map middleware adds the envelope, so no
//! handler builds one itself.
//!
//! ## Handler Modules
//!
//! - **[`health`]**: `GET /health` (public)
//! - **[`auth`]**: `POST /api/auth/register`, `POST /api/auth/login` (public), `GET /api/auth/me`
//! - **[`api_keys`]**: `GET|POST /api/api-keys`, `DELETE /api/api-keys/{id}`
//! - **[`projects`]**: `GET|POST /api/projects`, `GET|PUT|DELETE /api/projects/{id}`
//! - **[`contacts`]**: `GET|POST /api/contacts`, `GET|PUT|DELETE /api/contacts/{id}`
//! - **[`users`]**: `GET /api/users`, `GET /api/users/{id}`
//!
//! ## Handler Architecture
//!
//! ```rust,ignore
//! async fn handler(
//!     State(pool): State<DbPool>,                      // Shared state
//!     Authenticated(principal): Authenticated,         // Who is calling
//!     ValidatedJson(req): ValidatedJson<RequestBody>,  // Parsed and validated body
//! ) -> Result<Json<Response>> {
//!     // Handler logic...
//! }
//! ```

pub mod api_keys;
pub mod auth;
pub mod contacts;
pub mod health;
pub mod projects;
pub mod users;
