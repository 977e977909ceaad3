//! Attendance write paths: session start and the three capture protocols.

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse, response::Response};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, error_response};
use services::{capture, session_manager};

use super::common::{
    AttendanceRecordResponse, AttendanceSessionResponse, MarkManualReq, MarkQrReq, MarkSwipeReq,
    StartSessionReq, SwipeResponse, principal,
};

/// POST /api/attendance/sessions/start
///
/// Opens an Active session for a class the caller teaches.
pub async fn start_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<StartSessionReq>,
) -> Response {
    match session_manager::start_session(
        state.db(),
        &principal(&user),
        body.class_id,
        body.attendance_type,
    )
    .await
    {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceSessionResponse::from(session),
                "Attendance session started",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/attendance/records/qr
///
/// Marks the student a scanned code resolves to as Present.
pub async fn mark_qr(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<MarkQrReq>,
) -> Response {
    match capture::mark_qr(state.db(), &principal(&user), body.session_id, &body.scan_code).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance recorded",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/attendance/records/manual
///
/// Creates or overwrites one student's record with an explicit status.
pub async fn mark_manual(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<MarkManualReq>,
) -> Response {
    match capture::mark_manual(
        state.db(),
        &principal(&user),
        body.session_id,
        body.student_profile_id,
        body.status,
    )
    .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance recorded",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// POST /api/attendance/records/swipe
///
/// Captures a whole batch against a brand-new, already-completed session.
pub async fn mark_swipe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<MarkSwipeReq>,
) -> Response {
    match capture::mark_swipe(
        state.db(),
        &principal(&user),
        body.class_id,
        body.subject_id,
        &body.records,
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SwipeResponse {
                    session: AttendanceSessionResponse::from(outcome.session),
                    records: outcome.records.into_iter().map(Into::into).collect(),
                },
                "Swipe attendance recorded",
            )),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
