use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

mod common;
mod get;
mod post;
mod put;

pub use get::{get_session, list_active_sessions, list_sessions, session_records, student_records};
pub use post::{mark_manual, mark_qr, mark_swipe, start_session};
pub use put::{cancel_session, end_session, update_record};

use crate::auth::guards::{allow_admin_or_teacher, allow_authenticated, allow_teacher};

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions/start",
            post(start_session).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/sessions/active",
            get(list_active_sessions).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/sessions",
            get(list_sessions).route_layer(from_fn(allow_admin_or_teacher)),
        )
        .route(
            "/sessions/{session_id}",
            get(get_session).route_layer(from_fn(allow_admin_or_teacher)),
        )
        .route(
            "/sessions/{session_id}/end",
            put(end_session).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/sessions/{session_id}/cancel",
            put(cancel_session).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/records/qr",
            post(mark_qr).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/records/manual",
            post(mark_manual).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/records/swipe",
            post(mark_swipe).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/records/session/{session_id}",
            get(session_records).route_layer(from_fn(allow_admin_or_teacher)),
        )
        .route(
            "/records/student/{student_profile_id}",
            get(student_records).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/records/{record_id}",
            put(update_record).route_layer(from_fn(allow_admin_or_teacher)),
        )
}
