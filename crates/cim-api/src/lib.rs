//! # cim-api — Axum API Service for the Civic Issue Management Stack
//!
//! Serves the municipal and state portals from one process: the complaint
//! lifecycle, per-municipality aggregate statistics, the paginated
//! filtered query service, and the official auth gateway.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                        | Auth   |
//! |-------------------------|-------------------------------|--------|
//! | `/municipalities/login`, `/municipalities/categories` | [`routes::municipalities`] | public |
//! | `/municipalities/*`     | [`routes::municipalities`]    | bearer |
//! | `/complaints/*`         | [`routes::complaints`]        | bearer |
//! | `/State/login`          | [`routes::state_portal`]      | public |
//! | `/State/allDistricts`   | [`routes::state_portal`]      | bearer |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware (protected routes only) → Handler
//! ```

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod lifecycle;
pub mod query;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Login, the category catalog, and the health probes (`/health/*`) are
/// mounted outside the auth middleware so they remain accessible without
/// credentials.
pub fn app(state: AppState) -> Router {
    let auth_keys = state.auth.clone();

    let protected = Router::new()
        .merge(routes::municipalities::protected_router())
        .merge(routes::complaints::router())
        .merge(routes::state_portal::protected_router())
        .layer(from_fn(auth::auth_middleware));

    let public = Router::new()
        .merge(routes::municipalities::public_router())
        .merge(routes::state_portal::public_router())
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_keys))
        .with_state(state)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
