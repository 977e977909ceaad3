//! Attendance read paths: session listings and record projections.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, error_response};
use services::query::StudentRecordView;
use services::session_manager::{self, SessionFilter};
use services::query;

use super::common::{
    AttendanceSessionResponse, SessionListResponse, SessionRecordsResponse, principal,
};

/// GET /api/attendance/sessions/active
///
/// The calling teacher's currently Active sessions.
pub async fn list_active_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match session_manager::list_active_sessions(state.db(), &principal(&user)).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionListResponse::from_models(sessions),
                "Active sessions retrieved",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/attendance/sessions
///
/// Filtered listing; teachers implicitly see only their own sessions.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(filter): Query<SessionFilter>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match session_manager::list_sessions(state.db(), &principal(&user), &filter).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionListResponse::from_models(sessions),
                "Attendance sessions retrieved",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/attendance/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match session_manager::get_session(state.db(), &principal(&user), session_id).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceSessionResponse::from(session),
                "Attendance session retrieved",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /api/attendance/records/session/{session_id}
///
/// All records of one session joined with student display identity.
pub async fn session_records(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match query::session_records(state.db(), &principal(&user), session_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionRecordsResponse {
                    count: records.len(),
                    records,
                },
                "Session records retrieved",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Serialize)]
pub struct StudentRecordsResponse {
    pub count: usize,
    pub records: Vec<StudentRecordView>,
}

/// GET /api/attendance/records/student/{student_profile_id}
///
/// A student's history; students may only request their own.
pub async fn student_records(
    State(state): State<AppState>,
    Path(student_profile_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match query::student_records(state.db(), &principal(&user), student_profile_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                StudentRecordsResponse {
                    count: records.len(),
                    records,
                },
                "Student records retrieved",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
