use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;

/// A class (course offering) that owns sessions and a roster.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short handle shown to students, e.g. "RUST101".
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::class_role::Entity")]
    Roster,
    #[sea_orm(has_many = "super::class_session::Entity")]
    Sessions,
}

impl Related<super::class_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roster.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::class_session::Entity> for Entity {
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
        code: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let class = ActiveModel {
            code: Set(code.to_owned()),
            title: Set(title.to_owned()),
            description: Set(description.map(|s| s.to_owned())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        class.insert(db).await
    }
}
