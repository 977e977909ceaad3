//! The three attendance-capture protocols: QR scan, manual entry, and the
//! swipe batch. QR and manual attach to an existing Active session; swipe
//! creates its own already-completed session.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set, TransactionTrait,
};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::info;

use db::models::attendance_record::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as RecordEntity,
    Model as AttendanceRecord, RecordStatus,
};
use db::models::attendance_session::{
    ActiveModel as SessionActiveModel, AttendanceType, Model as AttendanceSession, SessionStatus,
};
use db::models::class::{Entity as ClassEntity, Model as Class};
use db::models::student_profile::{Entity as ProfileEntity, Model as StudentProfile};

use crate::error::{ServiceError, is_unique_violation};
use crate::principal::Principal;
use crate::session_manager::require_session;

const ALREADY_MARKED: &str = "student has already been marked for this session";

/// One row of a swipe batch.
#[derive(Debug, Clone, Deserialize)]
pub struct SwipeEntry {
    pub student_profile_id: i64,
    pub status: RecordStatus,
}

/// Result of a swipe batch: the instant session plus its records.
#[derive(Debug)]
pub struct SwipeOutcome {
    pub session: AttendanceSession,
    pub records: Vec<AttendanceRecord>,
}

/// Marks a student Present from a scanned QR code string.
///
/// The code resolves to a student profile by exact match; the student must
/// be enrolled in the session's class; a second scan for the same student
/// is a conflict. The status is always Present — a physical scan is by
/// definition an attendance confirmation.
pub async fn mark_qr(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
    scanned_code: &str,
) -> Result<AttendanceRecord, ServiceError> {
    let session = markable_session(db, principal, session_id).await?;

    let profile = StudentProfile::find_by_scan_code(db, scanned_code.trim())
        .await?
        .ok_or_else(|| ServiceError::NotFound("invalid scan code: student not found".into()))?;

    ensure_enrolled(db, session.class_id, &profile).await?;

    let existing = find_record(db, session.id, profile.id).await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict(ALREADY_MARKED.into()));
    }

    let record = insert_record(db, session.id, profile.id, RecordStatus::Present)
        .await
        .map_err(|e| ServiceError::from_insert(e, ALREADY_MARKED))?;

    info!(
        session_id = session.id,
        student_profile_id = profile.id,
        "attendance marked via qr scan"
    );
    Ok(record)
}

/// Marks or re-marks a student by explicit id and caller-supplied status.
///
/// Unlike QR, an existing record is overwritten in place (status and
/// marked_at), so a teacher can correct a mistake by marking again.
pub async fn mark_manual(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
    student_profile_id: i64,
    status: RecordStatus,
) -> Result<AttendanceRecord, ServiceError> {
    let session = markable_session(db, principal, session_id).await?;

    let profile = ProfileEntity::find_by_id(student_profile_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("student profile {student_profile_id} not found"))
        })?;

    ensure_enrolled(db, session.class_id, &profile).await?;

    if let Some(existing) = find_record(db, session.id, profile.id).await? {
        return overwrite_record(db, existing, status).await;
    }

    match insert_record(db, session.id, profile.id, status).await {
        Ok(record) => Ok(record),
        // A concurrent capture won the insert; manual marking overwrites it.
        Err(e) if is_unique_violation(&e) => {
            let existing = find_record(db, session.id, profile.id)
                .await?
                .ok_or(ServiceError::Database(e))?;
            overwrite_record(db, existing, status).await
        }
        Err(e) => Err(ServiceError::Database(e)),
    }
}

/// Captures a whole class roster in one retroactive batch.
///
/// Creates a brand-new session already in terminal state (Completed, start
/// and end both now) and inserts one record per entry, all inside a single
/// transaction: either the session and every record persist, or nothing
/// does. Entries are trusted bulk input from the teacher's own UI and are
/// only roster-checked when `SWIPE_ENFORCE_MEMBERSHIP` is on.
pub async fn mark_swipe(
    db: &DatabaseConnection,
    principal: &Principal,
    class_id: i64,
    subject_id: Option<i64>,
    entries: &[SwipeEntry],
) -> Result<SwipeOutcome, ServiceError> {
    if entries.is_empty() {
        return Err(ServiceError::InvalidInput(
            "no attendance entries provided".into(),
        ));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.student_profile_id) {
            return Err(ServiceError::Conflict(format!(
                "duplicate student profile {} in swipe batch",
                entry.student_profile_id
            )));
        }
    }

    let class = ClassEntity::find_by_id(class_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("class {class_id} not found")))?;
    if class.teacher_id != principal.user_id {
        return Err(ServiceError::Forbidden(
            "you are not authorized to capture attendance for this class".into(),
        ));
    }

    if util::config::swipe_enforce_membership() {
        for entry in entries {
            if !Class::is_enrolled(db, class_id, entry.student_profile_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "student profile {} is not enrolled in this class",
                    entry.student_profile_id
                )));
            }
        }
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let session = SessionActiveModel {
        class_id: Set(class_id),
        teacher_id: Set(principal.user_id),
        subject_id: Set(subject_id),
        session_date: Set(now.date_naive()),
        start_time: Set(now),
        end_time: Set(Some(now)),
        status: Set(SessionStatus::Completed),
        attendance_type: Set(AttendanceType::Swipe),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let session = session.insert(&txn).await?;

    let rows: Vec<RecordActiveModel> = entries
        .iter()
        .map(|entry| RecordActiveModel {
            session_id: Set(session.id),
            student_profile_id: Set(entry.student_profile_id),
            status: Set(entry.status),
            marked_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .collect();

    // Dropping the transaction on any error rolls the whole batch back.
    RecordEntity::insert_many(rows)
        .exec(&txn)
        .await
        .map_err(|e| ServiceError::from_insert(e, "duplicate attendance record in swipe batch"))?;

    txn.commit().await?;

    let records = RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session.id))
        .all(db)
        .await?;

    info!(
        session_id = session.id,
        class_id,
        records = records.len(),
        "swipe batch captured"
    );
    Ok(SwipeOutcome { session, records })
}

/// Precondition pipeline shared by QR and manual capture: the session must
/// exist and be Active, and the caller must be its owning teacher.
async fn markable_session(
    db: &DatabaseConnection,
    principal: &Principal,
    session_id: i64,
) -> Result<AttendanceSession, ServiceError> {
    let session = match require_session(db, session_id).await {
        Ok(s) if s.is_active() => s,
        Ok(_) | Err(ServiceError::NotFound(_)) => {
            return Err(ServiceError::InvalidState(
                "session is not active or does not exist".into(),
            ));
        }
        Err(e) => return Err(e),
    };

    if session.teacher_id != principal.user_id {
        return Err(ServiceError::Forbidden(
            "not authorized for this session".into(),
        ));
    }

    Ok(session)
}

async fn ensure_enrolled(
    db: &DatabaseConnection,
    class_id: i64,
    profile: &StudentProfile,
) -> Result<(), ServiceError> {
    if !Class::is_enrolled(db, class_id, profile.id).await? {
        return Err(ServiceError::NotFound(format!(
            "student {} is not enrolled in this class",
            profile.student_number
        )));
    }
    Ok(())
}

async fn find_record(
    db: &DatabaseConnection,
    session_id: i64,
    student_profile_id: i64,
) -> Result<Option<AttendanceRecord>, sea_orm::DbErr> {
    RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session_id))
        .filter(RecordColumn::StudentProfileId.eq(student_profile_id))
        .one(db)
        .await
}

async fn insert_record<C: ConnectionTrait>(
    db: &C,
    session_id: i64,
    student_profile_id: i64,
    status: RecordStatus,
) -> Result<AttendanceRecord, sea_orm::DbErr> {
    let now = Utc::now();
    let record = RecordActiveModel {
        session_id: Set(session_id),
        student_profile_id: Set(student_profile_id),
        status: Set(status),
        marked_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    record.insert(db).await
}

async fn overwrite_record(
    db: &DatabaseConnection,
    existing: AttendanceRecord,
    status: RecordStatus,
) -> Result<AttendanceRecord, ServiceError> {
    let now = Utc::now();
    let mut active = existing.into_active_model();
    active.status = Set(status);
    active.marked_at = Set(now);
    active.updated_at = Set(now);
    let updated = active.update(db).await?;
    Ok(updated)
}
