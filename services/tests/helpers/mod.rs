use db::models::{
    class::Model as Class,
    student_profile::Model as StudentProfile,
    user::{Model as User, Role},
};
use sea_orm::DatabaseConnection;
use services::Principal;

/// A seeded classroom: one class owned by `teacher` with three enrolled
/// students, a second class owned by `rival_teacher`, and one student
/// profile (`outsider`) not enrolled anywhere.
#[allow(dead_code)]
pub struct TestData {
    pub db: DatabaseConnection,
    pub admin: Principal,
    pub teacher: Principal,
    pub rival_teacher: Principal,
    /// Student principal for the owner of `profiles[0]`.
    pub student: Principal,
    pub class_id: i64,
    pub rival_class_id: i64,
    pub profiles: Vec<StudentProfile>,
    pub outsider: StudentProfile,
}

pub async fn setup() -> TestData {
    // The config singleton loads from the environment on first access.
    unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "test-secret");
    }

    let db = db::test_utils::setup_test_db().await;

    let admin_user = User::create(&db, "admin1", "admin1@test.com", "hash", Role::Admin)
        .await
        .unwrap();
    let teacher_user = User::create(&db, "teacher1", "teacher1@test.com", "hash", Role::Teacher)
        .await
        .unwrap();
    let rival_user = User::create(&db, "teacher2", "teacher2@test.com", "hash", Role::Teacher)
        .await
        .unwrap();

    let class = Class::create(
        &db,
        "Data Structures",
        "cos212",
        "Computer Science",
        None,
        teacher_user.id,
    )
    .await
    .unwrap();
    let rival_class = Class::create(
        &db,
        "Calculus",
        "wtw114",
        "Mathematics",
        None,
        rival_user.id,
    )
    .await
    .unwrap();

    let mut profiles = Vec::new();
    for (i, name) in ["alice", "bob", "carol"].iter().enumerate() {
        let user = User::create(
            &db,
            name,
            &format!("{name}@test.com"),
            "hash",
            Role::Student,
        )
        .await
        .unwrap();
        let profile = StudentProfile::create(&db, user.id, &format!("STU{:04}", i + 1))
            .await
            .unwrap();
        Class::enroll_student(&db, class.id, profile.id)
            .await
            .unwrap();
        profiles.push(profile);
    }

    let outsider_user = User::create(&db, "dave", "dave@test.com", "hash", Role::Student)
        .await
        .unwrap();
    let outsider = StudentProfile::create(&db, outsider_user.id, "STU9999")
        .await
        .unwrap();

    let student_user_id = profiles[0].user_id;

    TestData {
        db,
        admin: Principal::new(admin_user.id, Role::Admin),
        teacher: Principal::new(teacher_user.id, Role::Teacher),
        rival_teacher: Principal::new(rival_user.id, Role::Teacher),
        student: Principal::new(student_user_id, Role::Student),
        class_id: class.id,
        rival_class_id: rival_class.id,
        profiles,
        outsider,
    }
}
