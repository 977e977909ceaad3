use api::auth::generate_jwt;
use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use db::models::{
    class::Model as Class,
    student_profile::Model as StudentProfile,
    user::{Model as User, Role},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use util::state::AppState;

struct TestApp {
    app: Router,
    admin_token: String,
    teacher_token: String,
    student_token: String,
    class_id: i64,
    profiles: Vec<StudentProfile>,
}

async fn setup() -> TestApp {
    unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "test-secret");
    }

    let db = db::test_utils::setup_test_db().await;

    let admin = User::create(&db, "admin1", "admin1@test.com", "hash", Role::Admin)
        .await
        .unwrap();
    let teacher = User::create(&db, "teacher1", "teacher1@test.com", "hash", Role::Teacher)
        .await
        .unwrap();

    let class = Class::create(
        &db,
        "Data Structures",
        "cos212",
        "Computer Science",
        None,
        teacher.id,
    )
    .await
    .unwrap();

    let mut profiles = Vec::new();
    let mut student_user_id = 0;
    for (i, name) in ["alice", "bob"].iter().enumerate() {
        let user = User::create(&db, name, &format!("{name}@test.com"), "hash", Role::Student)
            .await
            .unwrap();
        let profile = StudentProfile::create(&db, user.id, &format!("STU{:04}", i + 1))
            .await
            .unwrap();
        Class::enroll_student(&db, class.id, profile.id)
            .await
            .unwrap();
        if i == 0 {
            student_user_id = user.id;
        }
        profiles.push(profile);
    }

    let (admin_token, _) = generate_jwt(admin.id, Role::Admin);
    let (teacher_token, _) = generate_jwt(teacher.id, Role::Teacher);
    let (student_token, _) = generate_jwt(student_user_id, Role::Student);

    let app = Router::new()
        .nest("/api", routes())
        .with_state(AppState::new(db));

    TestApp {
        app,
        admin_token,
        teacher_token,
        student_token,
        class_id: class.id,
        profiles,
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_is_public() {
    let test = setup().await;

    let response = test
        .app
        .oneshot(request("GET", "/api/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn attendance_routes_require_a_token() {
    let test = setup().await;

    let response = test
        .app
        .oneshot(request("GET", "/api/attendance/sessions/active", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_start_sessions() {
    let test = setup().await;

    let response = test
        .app
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.student_token),
            Some(json!({ "class_id": test.class_id, "attendance_type": "qr" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn session_start_and_end_round_trip() {
    let test = setup().await;

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.teacher_token),
            Some(json!({ "class_id": test.class_id, "attendance_type": "qr" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "active");
    let session_id = json["data"]["id"].as_i64().unwrap();

    let response = test
        .app
        .oneshot(request(
            "PUT",
            &format!("/api/attendance/sessions/{session_id}/end"),
            Some(&test.teacher_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(!json["data"]["end_time"].is_null());
}

#[tokio::test]
async fn second_session_start_for_class_is_conflict() {
    let test = setup().await;
    let body = json!({ "class_id": test.class_id, "attendance_type": "qr" });

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.teacher_token),
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = test
        .app
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.teacher_token),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn qr_capture_marks_once_then_conflicts() {
    let test = setup().await;

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.teacher_token),
            Some(json!({ "class_id": test.class_id, "attendance_type": "qr" })),
        ))
        .await
        .unwrap();
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = json!({ "session_id": session_id, "scan_code": test.profiles[0].scan_code });
    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/records/qr",
            Some(&test.teacher_token),
            Some(body.clone()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "present");
    assert_eq!(json["data"]["session_id"], session_id);

    let response = test
        .app
        .oneshot(request(
            "POST",
            "/api/attendance/records/qr",
            Some(&test.teacher_token),
            Some(body),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn manual_capture_and_record_update() {
    let test = setup().await;

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/sessions/start",
            Some(&test.teacher_token),
            Some(json!({ "class_id": test.class_id, "attendance_type": "qr" })),
        ))
        .await
        .unwrap();
    let session_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/records/manual",
            Some(&test.teacher_token),
            Some(json!({
                "session_id": session_id,
                "student_profile_id": test.profiles[1].id,
                "status": "late"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let record_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = test
        .app
        .oneshot(request(
            "PUT",
            &format!("/api/attendance/records/{record_id}"),
            Some(&test.admin_token),
            Some(json!({ "status": "excused" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "excused");
}

#[tokio::test]
async fn swipe_batch_creates_session_and_records() {
    let test = setup().await;

    let response = test
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/api/attendance/records/swipe",
            Some(&test.teacher_token),
            Some(json!({
                "class_id": test.class_id,
                "subject_id": null,
                "records": [
                    { "student_profile_id": test.profiles[0].id, "status": "present" },
                    { "student_profile_id": test.profiles[1].id, "status": "absent" }
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["session"]["status"], "completed");
    assert_eq!(json["data"]["session"]["attendance_type"], "swipe");
    assert_eq!(json["data"]["records"].as_array().unwrap().len(), 2);

    let session_id = json["data"]["session"]["id"].as_i64().unwrap();
    let response = test
        .app
        .oneshot(request(
            "GET",
            &format!("/api/attendance/records/session/{session_id}"),
            Some(&test.teacher_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["count"], 2);
}

#[tokio::test]
async fn session_listing_respects_roles() {
    let test = setup().await;

    let response = test
        .app
        .clone()
        .oneshot(request(
            "GET",
            "/api/attendance/sessions",
            Some(&test.teacher_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 0);

    let response = test
        .app
        .oneshot(request(
            "GET",
            "/api/attendance/sessions",
            Some(&test.student_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn students_only_see_their_own_records() {
    let test = setup().await;

    let own = test.profiles[0].id;
    let response = test
        .app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/attendance/records/student/{own}"),
            Some(&test.student_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let other = test.profiles[1].id;
    let response = test
        .app
        .oneshot(request(
            "GET",
            &format!("/api/attendance/records/student/{other}"),
            Some(&test.student_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
