//! # Server Setup
//!
//! State construction, route registration, middleware stack and HTTP
//! server startup.
//!
//! Middleware order, outermost first:
//!
//! ```text
//! CORS -> stamp_req -> TraceLayer -> log_requests -> map_res -> CatchPanic -> require_auth (route layer) -> handler
//! ```

// region: --- Imports
use crate::auth::{ApiKeyStrategy, AuthDispatcher, AuthStrategy, BearerStrategy};
use crate::error::Error;
use crate::handlers;
use crate::middleware::{log_requests, map_res, panic_to_error, require_auth, stamp_req};
use axum::{
    extract::FromRef,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use lib_core::model::store::schema::ensure_schema;
use lib_core::model::store::SqlCredentialStore;
use lib_core::{create_pool, AppError, Config, ContextStore, DbPool};
use lib_utils::{get_env, get_env_or};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

/// Matched-path patterns that skip authentication.
pub const PUBLIC_ROUTES: &[&str] = &["/health", "/api/auth/login", "/api/auth/register"];

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub auth: AuthDispatcher,
}

impl AppState {
    /// Bearer first, then API key, against the given pool and secret.
    pub fn new(db: DbPool, config: Config) -> Self {
        let strategies: Vec<Arc<dyn AuthStrategy>> = vec![
            Arc::new(BearerStrategy::new(config.jwt_secret.clone())),
            Arc::new(ApiKeyStrategy::new(Arc::new(SqlCredentialStore::new(db.clone())))),
        ];
        let auth = AuthDispatcher::new(strategies).with_public_routes(PUBLIC_ROUTES.iter().copied());

        Self { db, config, auth }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for AuthDispatcher {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// `BIND_ADDRESS` and comma-separated `ALLOWED_ORIGINS`, with defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allowed_origins = get_env("ALLOWED_ORIGINS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            bind_address: get_env_or("BIND_ADDRESS", &defaults.bind_address),
            allowed_origins,
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global subscriber. `LOG_LEVEL` accepts any `EnvFilter`
/// directive and defaults to `info`. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(get_env("LOG_LEVEL").ok()))
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

fn log_filter(level: Option<String>) -> EnvFilter {
    level
        .and_then(|level| EnvFilter::try_new(level.to_lowercase()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - Database connection or schema bootstrap fails
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing();

    info!("CRM BACKEND STARTING");

    let app_config = lib_core::config::init_config().map_err(anyhow::Error::msg)?.clone();

    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool(&app_config.database_url).await?;
    ensure_schema(&pool).await?;
    info!("Schema ready");

    let state = AppState::new(pool, app_config);
    info!(strategies = ?state.auth.strategy_names(), "Auth strategies registered");

    let app = create_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("SERVER READY: http://{}", config.bind_address);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

async fn route_not_found() -> Error {
    AppError::NotFound("Route not found".to_string()).into()
}

/// Routes, auth route layer, fallback and the shared middleware stack.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, HeaderName::from_static("x-api-key")])
        .expose_headers([HeaderName::from_static("x-request-id")]);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/api-keys",
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        .route("/api/api-keys/{id}", axum::routing::delete(handlers::api_keys::delete_api_key))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/contacts",
            get(handlers::contacts::list_contacts).post(handlers::contacts::create_contact),
        )
        .route(
            "/api/contacts/{id}",
            get(handlers::contacts::get_contact)
                .put(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        )
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/{id}", get(handlers::users::get_user))
        .route_layer(middleware::from_fn_with_state(state.auth.clone(), require_auth))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_to_error))
        .layer(middleware::from_fn(map_res))
        .layer(middleware::from_fn(log_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %ContextStore::request_id_or_unknown(),
                        method = %request.method(),
                        uri = %request.uri().path(),
                    )
                })
                .on_request(())
                .on_response(())
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE]"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(stamp_req))
        .layer(cors)
}
// endregion: --- Server Setup
