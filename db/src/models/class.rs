use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QuerySelect, Set};
use serde::Serialize;

/// A class (one teacher, a set of enrolled student profiles). The roster
/// queries on this model are what the attendance core consults for
/// ownership and membership checks.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub code: String,
    pub subject: String,
    pub description: Option<String>,
    /// Primary teacher for the class.
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::class_student::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    Sessions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        code: &str,
        subject: &str,
        description: Option<&str>,
        teacher_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let class = ActiveModel {
            name: Set(name.to_owned()),
            code: Set(code.to_uppercase()),
            subject: Set(subject.to_owned()),
            description: Set(description.map(|s| s.to_owned())),
            teacher_id: Set(teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        class.insert(db).await
    }

    /// Adds a student profile to the class roster.
    pub async fn enroll_student(
        db: &DatabaseConnection,
        class_id: i64,
        student_profile_id: i64,
    ) -> Result<(), DbErr> {
        let enrollment = super::class_student::ActiveModel {
            class_id: Set(class_id),
            student_profile_id: Set(student_profile_id),
        };
        super::class_student::Entity::insert(enrollment)
            .exec(db)
            .await?;
        Ok(())
    }

    /// Roster membership check: is the given student profile enrolled?
    pub async fn is_enrolled(
        db: &DatabaseConnection,
        class_id: i64,
        student_profile_id: i64,
    ) -> Result<bool, DbErr> {
        let found = super::class_student::Entity::find()
            .filter(super::class_student::Column::ClassId.eq(class_id))
            .filter(super::class_student::Column::StudentProfileId.eq(student_profile_id))
            .one(db)
            .await?;
        Ok(found.is_some())
    }

    /// All enrolled student profile ids for the class.
    pub async fn enrolled_profile_ids(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<i64>, DbErr> {
        super::class_student::Entity::find()
            .filter(super::class_student::Column::ClassId.eq(class_id))
            .select_only()
            .column(super::class_student::Column::StudentProfileId)
            .into_tuple()
            .all(db)
            .await
    }
}
