use axum::{Json, Router, http::StatusCode, routing::get};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;

#[derive(Serialize, Default)]
pub struct HealthStatus {
    pub status: String,
}

/// GET /api/health — liveness probe, no authentication.
async fn health() -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            HealthStatus {
                status: "ok".into(),
            },
            "Service healthy",
        )),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}
