//! Read-side projections of sessions and records, plus the administrative
//! record correction path.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};

use db::models::attendance_record::{
    self, Column as RecordColumn, Entity as RecordEntity, Model as AttendanceRecord, RecordStatus,
};
use db::models::attendance_session::{Entity as SessionEntity, Model as AttendanceSession};
use db::models::student_profile::{self, Model as StudentProfile};
use db::models::user;

use crate::error::ServiceError;
use crate::principal::Principal;
use crate::session_manager::require_session;

/// One session record joined with the student's display identity.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct SessionRecordView {
    pub id: i64,
    pub session_id: i64,
    pub student_profile_id: i64,
    pub status: RecordStatus,
    pub marked_at: DateTime<Utc>,
    pub student_number: String,
    pub username: String,
}

/// A student's record paired with the session it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct StudentRecordView {
    pub record: AttendanceRecord,
    pub session: Option<AttendanceSession>,
}

/// Administrative field changes for [`update_record`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecordChanges {
    pub status: Option<RecordStatus>,
}

/// All records for one session, joined with who they belong to.
pub async fn session_records(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
) -> Result<Vec<SessionRecordView>, ServiceError> {
    if principal.is_student() {
        return Err(ServiceError::Forbidden(
            "students may not view session records".into(),
        ));
    }

    require_session(db, session_id).await?;

    let rows = RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session_id))
        .join(
            JoinType::InnerJoin,
            attendance_record::Relation::Profile.def(),
        )
        .join(JoinType::InnerJoin, student_profile::Relation::User.def())
        .select_only()
        .column(RecordColumn::Id)
        .column(RecordColumn::SessionId)
        .column(RecordColumn::StudentProfileId)
        .column(RecordColumn::Status)
        .column(RecordColumn::MarkedAt)
        .column_as(student_profile::Column::StudentNumber, "student_number")
        .column_as(user::Column::Username, "username")
        .order_by_asc(RecordColumn::MarkedAt)
        .into_model::<SessionRecordView>()
        .all(db)
        .await?;

    Ok(rows)
}

/// All records for one student, newest first, each with its session.
///
/// A student caller may only request their own profile; admins and
/// teachers may request any.
pub async fn student_records(
    db: &DatabaseConnection,
    principal: &Principal,
    student_profile_id: i64,
) -> Result<Vec<StudentRecordView>, ServiceError> {
    if principal.is_student() {
        let own = StudentProfile::find_by_user_id(db, principal.user_id).await?;
        match own {
            Some(profile) if profile.id == student_profile_id => {}
            _ => {
                return Err(ServiceError::Forbidden(
                    "not authorized to view these records".into(),
                ));
            }
        }
    }

    let profile = db::models::student_profile::Entity::find_by_id(student_profile_id)
        .one(db)
        .await?;
    if profile.is_none() {
        return Err(ServiceError::NotFound(format!(
            "student profile {student_profile_id} not found"
        )));
    }

    let rows = RecordEntity::find()
        .filter(RecordColumn::StudentProfileId.eq(student_profile_id))
        .find_also_related(SessionEntity)
        .order_by_desc(RecordColumn::MarkedAt)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(record, session)| StudentRecordView { record, session })
        .collect())
}

/// Corrects a record by id.
///
/// Teachers may only touch records of sessions they own; admins may touch
/// any. Updating refreshes marked_at alongside the new status.
pub async fn update_record(
    db: &DatabaseConnection,
    principal: &Principal,
    record_id: i64,
    changes: &RecordChanges,
) -> Result<AttendanceRecord, ServiceError> {
    let record = RecordEntity::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("record not found".into()))?;

    if !principal.is_admin() {
        let session = require_session(db, record.session_id).await?;
        if session.teacher_id != principal.user_id {
            return Err(ServiceError::Forbidden(
                "not authorized to update this record".into(),
            ));
        }
    }

    let now = Utc::now();
    let mut active = record.into_active_model();
    if let Some(status) = changes.status {
        active.status = Set(status);
        active.marked_at = Set(now);
    }
    active.updated_at = Set(now);
    let updated = active.update(db).await?;
    Ok(updated)
}
