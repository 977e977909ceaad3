//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/attendance` → session lifecycle, capture protocols, and record
//!   queries (bearer-authenticated; per-route role guards on top)

use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use crate::routes::{attendance::attendance_routes, health::health_routes};

pub mod attendance;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
}
