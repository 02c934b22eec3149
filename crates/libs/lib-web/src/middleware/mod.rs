//! # Middleware
//!
//! Axum middleware, listed outermost first:
//!
//! - **[`mw_req_stamp`]**: request id and [`ContextStore`](lib_core::ContextStore) scope
//! - **[`mw_logging`]**: request/response log lines
//! - **[`mw_res_map`]**: envelope every response body
//! - **[`mw_auth`]**: run the auth dispatcher (route layer)

// region: --- Modules
pub mod mw_auth;
pub mod mw_logging;
pub mod mw_req_stamp;
pub mod mw_res_map;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_auth::require_auth;
pub use mw_logging::log_requests;
pub use mw_req_stamp::{new_request_id, stamp_req, REQUEST_ID_HEADER};
pub use mw_res_map::{map_res, panic_to_error};
// endregion: --- Re-exports
