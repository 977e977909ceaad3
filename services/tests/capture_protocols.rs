use db::models::attendance_record::{
    Column as RecordColumn, Entity as RecordEntity, RecordStatus,
};
use db::models::attendance_session::{
    AttendanceType, Column as SessionColumn, Entity as SessionEntity, SessionStatus,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serial_test::serial;
use services::ServiceError;
use services::capture::{SwipeEntry, mark_manual, mark_qr, mark_swipe};
use services::session_manager::{end_session, start_session};
use util::config::AppConfig;

mod helpers;

#[tokio::test]
async fn qr_scan_marks_student_present() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let record = mark_qr(&data.db, &data.teacher, session.id, &data.profiles[0].scan_code)
        .await
        .unwrap();

    assert_eq!(record.session_id, session.id);
    assert_eq!(record.student_profile_id, data.profiles[0].id);
    assert_eq!(record.status, RecordStatus::Present);
}

#[tokio::test]
async fn qr_scan_trims_surrounding_whitespace() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let padded = format!("  {}\n", data.profiles[0].scan_code);
    let record = mark_qr(&data.db, &data.teacher, session.id, &padded)
        .await
        .unwrap();
    assert_eq!(record.student_profile_id, data.profiles[0].id);
}

#[tokio::test]
async fn qr_scan_with_unknown_code_is_not_found() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let err = mark_qr(&data.db, &data.teacher, session.id, "no-such-code")
        .await
        .unwrap_err();
    match err {
        ServiceError::NotFound(msg) => assert!(msg.contains("invalid scan code")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn second_qr_scan_for_same_student_conflicts() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    mark_qr(&data.db, &data.teacher, session.id, &data.profiles[0].scan_code)
        .await
        .unwrap();
    let err = mark_qr(&data.db, &data.teacher, session.id, &data.profiles[0].scan_code)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let records = RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session.id))
        .all(&data.db)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn qr_scan_for_unenrolled_student_is_not_found() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let err = mark_qr(&data.db, &data.teacher, session.id, &data.outsider.scan_code)
        .await
        .unwrap_err();
    match err {
        ServiceError::NotFound(msg) => assert!(msg.contains("STU9999")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn qr_scan_on_ended_session_is_invalid_state() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();
    end_session(&data.db, &data.teacher, session.id).await.unwrap();

    let err = mark_qr(&data.db, &data.teacher, session.id, &data.profiles[0].scan_code)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn qr_scan_on_missing_session_is_invalid_state() {
    let data = helpers::setup().await;

    let err = mark_qr(&data.db, &data.teacher, 9999, &data.profiles[0].scan_code)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn qr_scan_by_non_owner_is_forbidden() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let err = mark_qr(
        &data.db,
        &data.rival_teacher,
        session.id,
        &data.profiles[0].scan_code,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn manual_mark_records_given_status() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let record = mark_manual(
        &data.db,
        &data.teacher,
        session.id,
        data.profiles[1].id,
        RecordStatus::Late,
    )
    .await
    .unwrap();

    assert_eq!(record.student_profile_id, data.profiles[1].id);
    assert_eq!(record.status, RecordStatus::Late);
}

#[tokio::test]
async fn manual_remark_overwrites_existing_record() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let first = mark_qr(&data.db, &data.teacher, session.id, &data.profiles[0].scan_code)
        .await
        .unwrap();
    let second = mark_manual(
        &data.db,
        &data.teacher,
        session.id,
        data.profiles[0].id,
        RecordStatus::Excused,
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.status, RecordStatus::Excused);

    let records = RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session.id))
        .all(&data.db)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn manual_mark_unknown_profile_is_not_found() {
    let data = helpers::setup().await;
    let session = start_session(&data.db, &data.teacher, data.class_id, AttendanceType::Qr)
        .await
        .unwrap();

    let err = mark_manual(&data.db, &data.teacher, session.id, 9999, RecordStatus::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn swipe_rejects_empty_batch() {
    let data = helpers::setup().await;

    let err = mark_swipe(&data.db, &data.teacher, data.class_id, None, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn swipe_rejects_duplicate_entries_without_persisting() {
    let data = helpers::setup().await;

    let entries = [
        SwipeEntry {
            student_profile_id: data.profiles[0].id,
            status: RecordStatus::Present,
        },
        SwipeEntry {
            student_profile_id: data.profiles[0].id,
            status: RecordStatus::Absent,
        },
    ];
    let err = mark_swipe(&data.db, &data.teacher, data.class_id, None, &entries)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let sessions = SessionEntity::find()
        .filter(SessionColumn::ClassId.eq(data.class_id))
        .all(&data.db)
        .await
        .unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn swipe_creates_completed_session_with_all_records() {
    let data = helpers::setup().await;

    let entries: Vec<SwipeEntry> = data
        .profiles
        .iter()
        .map(|p| SwipeEntry {
            student_profile_id: p.id,
            status: RecordStatus::Present,
        })
        .collect();

    let outcome = mark_swipe(&data.db, &data.teacher, data.class_id, Some(7), &entries)
        .await
        .unwrap();

    assert_eq!(outcome.session.status, SessionStatus::Completed);
    assert_eq!(outcome.session.attendance_type, AttendanceType::Swipe);
    assert_eq!(outcome.session.subject_id, Some(7));
    assert!(outcome.session.end_time.is_some());
    assert_eq!(outcome.records.len(), data.profiles.len());
    assert!(outcome.records.iter().all(|r| r.session_id == outcome.session.id));
}

#[tokio::test]
async fn swipe_for_someone_elses_class_is_forbidden() {
    let data = helpers::setup().await;

    let entries = [SwipeEntry {
        student_profile_id: data.profiles[0].id,
        status: RecordStatus::Present,
    }];
    let err = mark_swipe(&data.db, &data.rival_teacher, data.class_id, None, &entries)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn swipe_unknown_class_is_not_found() {
    let data = helpers::setup().await;

    let entries = [SwipeEntry {
        student_profile_id: data.profiles[0].id,
        status: RecordStatus::Present,
    }];
    let err = mark_swipe(&data.db, &data.teacher, 9999, None, &entries)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn swipe_accepts_unenrolled_entries_by_default() {
    let data = helpers::setup().await;
    AppConfig::set_swipe_enforce_membership(false);

    let entries = [SwipeEntry {
        student_profile_id: data.outsider.id,
        status: RecordStatus::Present,
    }];
    let outcome = mark_swipe(&data.db, &data.teacher, data.class_id, None, &entries)
        .await
        .unwrap();
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
#[serial]
async fn swipe_membership_enforcement_rejects_unenrolled() {
    let data = helpers::setup().await;
    AppConfig::set_swipe_enforce_membership(true);

    let entries = [SwipeEntry {
        student_profile_id: data.outsider.id,
        status: RecordStatus::Present,
    }];
    let result = mark_swipe(&data.db, &data.teacher, data.class_id, None, &entries).await;
    AppConfig::set_swipe_enforce_membership(false);

    match result.unwrap_err() {
        ServiceError::NotFound(msg) => assert!(msg.contains("not enrolled")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
