use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, Set};
use serde::Serialize;
use uuid::Uuid;

/// Student identity as the attendance core sees it.
///
/// `scan_code` is the opaque string a student's rendered QR image encodes;
/// a physical scan hands that string back to resolve the student. Rendering
/// the image itself happens outside this system.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user (one profile per user).
    pub user_id: i64,
    /// Unique institutional student number.
    pub student_number: String,
    /// Unique code resolved on QR capture.
    pub scan_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
    #[sea_orm(has_many = "super::class_student::Entity")]
    Enrollments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a profile with a freshly issued scan code.
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i64,
        student_number: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let profile = ActiveModel {
            user_id: Set(user_id),
            student_number: Set(student_number.to_owned()),
            scan_code: Set(Uuid::new_v4().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        profile.insert(db).await
    }

    /// Resolves a scanned code to the profile it was issued to (exact match).
    pub async fn find_by_scan_code(
        db: &DatabaseConnection,
        scan_code: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ScanCode.eq(scan_code))
            .one(db)
            .await
    }

    pub async fn find_by_user_id(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }
}
