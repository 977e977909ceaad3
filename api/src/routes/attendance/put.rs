//! Attendance mutations on existing entities: session termination and
//! record correction.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, error_response};
use services::{query, query::RecordChanges, session_manager};

use super::common::{AttendanceRecordResponse, AttendanceSessionResponse, principal};

/// PUT /api/attendance/sessions/{session_id}/end
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match session_manager::end_session(state.db(), &principal(&user), session_id).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceSessionResponse::from(session),
                "Attendance session ended",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// PUT /api/attendance/sessions/{session_id}/cancel
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match session_manager::cancel_session(state.db(), &principal(&user), session_id).await {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceSessionResponse::from(session),
                "Attendance session cancelled",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// PUT /api/attendance/records/{record_id}
///
/// Administrative correction of a single record.
pub async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(changes): Json<RecordChanges>,
) -> Response {
    match query::update_record(state.db(), &principal(&user), record_id, &changes).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance record updated",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
