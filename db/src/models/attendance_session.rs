use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A bounded window during which attendance may be captured for one class.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    /// Creator and owner; only this teacher may capture into the session.
    pub teacher_id: i64,
    /// Informational subject reference supplied by swipe batches.
    pub subject_id: Option<i64>,
    pub session_date: Date,
    pub start_time: DateTime<Utc>,
    /// Set if and only if the session is terminal.
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub attendance_type: AttendanceType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session lifecycle: created Active, transitions once to a terminal state,
/// never reopened. A partial unique index keeps at most one Active session
/// per class.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_session_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// How the session's records are captured. Manual marking reuses whichever
/// session is Active and carries no type of its own.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceType {
    #[sea_orm(string_value = "qr")]
    Qr,

    #[sea_orm(string_value = "swipe")]
    Swipe,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
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
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}
