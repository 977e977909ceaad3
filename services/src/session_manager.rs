//! Session lifecycle: start, end, cancel, and the teacher/admin-facing
//! session queries.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use db::models::attendance_session::{
    ActiveModel, AttendanceType, Column, Entity, Model as AttendanceSession, SessionStatus,
};
use db::models::class::Entity as ClassEntity;

use crate::error::ServiceError;
use crate::principal::Principal;

/// Optional narrowing criteria for [`list_sessions`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SessionFilter {
    pub class_id: Option<i64>,
    pub status: Option<SessionStatus>,
    pub attendance_type: Option<AttendanceType>,
}

/// Opens a new Active session for a class.
///
/// The caller must be the class's assigned teacher, and the class must not
/// already have an Active session. The existence pre-check gives a friendly
/// message; the partial unique index on (class_id, status=active) closes
/// the window between check and insert under concurrency.
pub async fn start_session(
    db: &DatabaseConnection,
    principal: &Principal,
    class_id: i64,
    attendance_type: AttendanceType,
) -> Result<AttendanceSession, ServiceError> {
    let class = ClassEntity::find_by_id(class_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("class {class_id} not found")))?;

    if class.teacher_id != principal.user_id {
        return Err(ServiceError::Forbidden(
            "you are not authorized to start a session for this class".into(),
        ));
    }

    let already_active = Entity::find()
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::Status.eq(SessionStatus::Active))
        .one(db)
        .await?;
    if already_active.is_some() {
        return Err(ServiceError::Conflict(
            "an active session for this class already exists".into(),
        ));
    }

    let now = Utc::now();
    let session = ActiveModel {
        class_id: Set(class_id),
        teacher_id: Set(principal.user_id),
        subject_id: Set(None),
        session_date: Set(now.date_naive()),
        start_time: Set(now),
        end_time: Set(None),
        status: Set(SessionStatus::Active),
        attendance_type: Set(attendance_type),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    session
        .insert(db)
        .await
        .map_err(|e| ServiceError::from_insert(e, "an active session for this class already exists"))
}

/// Ends an Active session, marking it Completed.
pub async fn end_session(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
) -> Result<AttendanceSession, ServiceError> {
    terminate_session(db, principal, session_id, SessionStatus::Completed).await
}

/// Cancels an Active session.
///
/// Gated on Active just like `end`; cancelling an already-terminal session
/// reports the current status instead of silently re-terminating it.
pub async fn cancel_session(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
) -> Result<AttendanceSession, ServiceError> {
    terminate_session(db, principal, session_id, SessionStatus::Cancelled).await
}

/// Shared Active -> terminal transition. The update is filtered on
/// status=Active so two concurrent terminations cannot both succeed; the
/// loser re-reads the row to name the status it lost to.
async fn terminate_session(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
    to: SessionStatus,
) -> Result<AttendanceSession, ServiceError> {
    let session = require_session(db, session_id).await?;

    if session.teacher_id != principal.user_id {
        return Err(ServiceError::Forbidden(format!(
            "not authorized to {} this session",
            match to {
                SessionStatus::Cancelled => "cancel",
                _ => "end",
            }
        )));
    }

    let now = Utc::now();
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to))
        .col_expr(Column::EndTime, Expr::value(Some(now)))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(session_id))
        .filter(Column::Status.eq(SessionStatus::Active))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        let current = require_session(db, session_id).await?;
        return Err(ServiceError::InvalidState(format!(
            "session is already {}",
            current.status
        )));
    }

    require_session(db, session_id).await
}

/// All Active sessions owned by the calling teacher.
pub async fn list_active_sessions(
    db: &DatabaseConnection,
    principal: &Principal,
) -> Result<Vec<AttendanceSession>, ServiceError> {
    let sessions = Entity::find()
        .filter(Column::TeacherId.eq(principal.user_id))
        .filter(Column::Status.eq(SessionStatus::Active))
        .order_by_desc(Column::StartTime)
        .all(db)
        .await?;
    Ok(sessions)
}

/// Filtered session listing. Teacher callers are implicitly narrowed to
/// their own sessions; admins see everything.
pub async fn list_sessions(
    db: &DatabaseConnection,
    principal: &Principal,
    filter: &SessionFilter,
) -> Result<Vec<AttendanceSession>, ServiceError> {
    if principal.is_student() {
        return Err(ServiceError::Forbidden(
            "students may not list attendance sessions".into(),
        ));
    }

    let mut sel = Entity::find();
    if principal.is_teacher() {
        sel = sel.filter(Column::TeacherId.eq(principal.user_id));
    }
    if let Some(class_id) = filter.class_id {
        sel = sel.filter(Column::ClassId.eq(class_id));
    }
    if let Some(status) = filter.status {
        sel = sel.filter(Column::Status.eq(status));
    }
    if let Some(attendance_type) = filter.attendance_type {
        sel = sel.filter(Column::AttendanceType.eq(attendance_type));
    }

    let sessions = sel.order_by_desc(Column::StartTime).all(db).await?;
    Ok(sessions)
}

/// Fetches one session. Teachers may only view their own; admins any.
pub async fn get_session(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
) -> Result<AttendanceSession, ServiceError> {
    let session = require_session(db, session_id).await?;

    if principal.is_teacher() && session.teacher_id != principal.user_id {
        return Err(ServiceError::Forbidden(
            "not authorized to view this session".into(),
        ));
    }
    if principal.is_student() {
        return Err(ServiceError::Forbidden(
            "students may not view attendance sessions".into(),
        ));
    }

    Ok(session)
}

pub(crate) async fn require_session(
    db: &DatabaseConnection,
    session_id: i64,
) -> Result<AttendanceSession, ServiceError> {
    Entity::find_by_id(session_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("session not found".into()))
}
