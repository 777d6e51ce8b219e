use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One successful check-in. The composite primary key is the storage-level
/// guarantee that a student can be recorded at most once per session:
/// racing submissions both reach the insert, and exactly one survives the
/// constraint.
///
/// Absence is never stored — enrolled students without a row here are
/// derived as absent at reporting time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// The code that was redeemed.
    pub attendance_code_id: i64,
    pub status: AttendanceStatus,
    pub checked_in_at: DateTime<Utc>,
}

/// Persisted classification of a check-in. `absent` is intentionally not a
/// member; it exists only in report output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "late")]
    Late,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::SessionId",
        to = "super::class_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::attendance_code::Entity",
        from = "Column::AttendanceCodeId",
        to = "super::attendance_code::Column::Id"
    )]
    Code,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::attendance_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Code.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The caller's own record for a session, if they have checked in.
    pub async fn find_for(
        db: &sea_orm::DatabaseConnection,
        session_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id((session_id, user_id)).one(db).await
    }
}
