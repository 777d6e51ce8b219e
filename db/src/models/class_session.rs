use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// A syllabus item (lecture, lab, live session) that attendance is tracked
/// against. The attendance columns are configuration the engine consumes;
/// the session itself is managed by the class tooling.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "class_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    /// Master switch: when false, no codes can be issued and no one can
    /// check in.
    pub attendance_enabled: bool,
    /// Scheduled start used for PRESENT/LATE classification.
    pub attendance_start_time: Option<DateTime<Utc>>,
    pub attendance_end_time: Option<DateTime<Utc>>,
    /// Minutes after start beyond which a check-in counts as LATE.
    pub late_threshold_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::attendance_code::Entity")]
    Codes,
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

impl Related<super::attendance_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Codes.def()
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
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        class_id: i64,
        title: &str,
        attendance_enabled: bool,
        attendance_start_time: Option<DateTime<Utc>>,
        attendance_end_time: Option<DateTime<Utc>>,
        late_threshold_minutes: Option<i32>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let session = ActiveModel {
            class_id: Set(class_id),
            title: Set(title.to_owned()),
            attendance_enabled: Set(attendance_enabled),
            attendance_start_time: Set(attendance_start_time),
            attendance_end_time: Set(attendance_end_time),
            late_threshold_minutes: Set(late_threshold_minutes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        session.insert(db).await
    }

    /// Looks a session up scoped to its class, so a session id from another
    /// class behaves like a missing session.
    pub async fn find_in_class(
        db: &DatabaseConnection,
        class_id: i64,
        session_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Id.eq(session_id))
            .filter(Column::ClassId.eq(class_id))
            .one(db)
            .await
    }

    pub async fn list_for_class(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }
}
