//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/auth` → login for a JWT (public)
//! - `/users` → account management (admin-only)
//! - `/classes` → class, roster, session and attendance endpoints
//!   (authenticated; per-operation authorization happens in the engine)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;

pub mod auth;
pub mod classes;
pub mod common;
pub mod health;
pub mod users;

/// Builds the complete application router. The caller nests this under
/// `/api` and owns the surrounding middleware (CORS, tracing).
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/classes",
            classes::classes_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
