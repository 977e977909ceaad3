//! Request and response shapes shared by the attendance handlers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use db::models::attendance_record::{Model as AttendanceRecord, RecordStatus};
use db::models::attendance_session::{
    AttendanceType, Model as AttendanceSession, SessionStatus,
};
use services::capture::SwipeEntry;
use services::{Principal, query::SessionRecordView};

use crate::auth::AuthUser;

/// Builds the domain-facing caller identity from verified claims.
pub fn principal(user: &AuthUser) -> Principal {
    Principal::new(user.0.sub, user.0.role)
}

// ---------- requests ----------

#[derive(Debug, Deserialize)]
pub struct StartSessionReq {
    pub class_id: i64,
    pub attendance_type: AttendanceType,
}

#[derive(Debug, Deserialize)]
pub struct MarkQrReq {
    pub session_id: i64,
    pub scan_code: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkManualReq {
    pub session_id: i64,
    pub student_profile_id: i64,
    pub status: RecordStatus,
}

#[derive(Debug, Deserialize)]
pub struct MarkSwipeReq {
    pub class_id: i64,
    pub subject_id: Option<i64>,
    pub records: Vec<SwipeEntry>,
}

// ---------- responses ----------

#[derive(Debug, Serialize)]
pub struct AttendanceSessionResponse {
    pub id: i64,
    pub class_id: i64,
    pub teacher_id: i64,
    pub subject_id: Option<i64>,
    pub session_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub attendance_type: AttendanceType,
}

impl From<AttendanceSession> for AttendanceSessionResponse {
    fn from(s: AttendanceSession) -> Self {
        Self {
            id: s.id,
            class_id: s.class_id,
            teacher_id: s.teacher_id,
            subject_id: s.subject_id,
            session_date: s.session_date,
            start_time: s.start_time,
            end_time: s.end_time,
            status: s.status,
            attendance_type: s.attendance_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub session_id: i64,
    pub student_profile_id: i64,
    pub status: RecordStatus,
    pub marked_at: DateTime<Utc>,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            session_id: r.session_id,
            student_profile_id: r.student_profile_id,
            status: r.status,
            marked_at: r.marked_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub count: usize,
    pub sessions: Vec<AttendanceSessionResponse>,
}

impl SessionListResponse {
    pub fn from_models(sessions: Vec<AttendanceSession>) -> Self {
        let sessions: Vec<AttendanceSessionResponse> =
            sessions.into_iter().map(Into::into).collect();
        Self {
            count: sessions.len(),
            sessions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionRecordsResponse {
    pub count: usize,
    pub records: Vec<SessionRecordView>,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub session: AttendanceSessionResponse,
    pub records: Vec<AttendanceRecordResponse>,
}
