use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The captured attendance outcome for one student within one session.
///
/// A unique index on (session_id, student_profile_id) guarantees at most one
/// record per student per session, even under concurrent capture calls.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub student_profile_id: i64,
    pub status: RecordStatus,
    /// When the attendance was (last) marked for this student.
    pub marked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_record_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RecordStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "excused")]
    Excused,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::student_profile::Entity",
        from = "Column::StudentProfileId",
        to = "super::student_profile::Column::Id"
    )]
    Profile,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}
