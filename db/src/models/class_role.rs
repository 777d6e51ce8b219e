use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The roster table: who belongs to a class and in what capacity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "class_roles")]
pub struct Model {
    /// User ID (foreign key to `users`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// Class ID (foreign key to `classes`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_id: i64,

    /// Role within the class: Instructor or Student.
    pub role: Role,
}

/// Role a user holds within a class. Platform admins are a flag on the
/// user record instead, and outrank both.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "class_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "instructor")]
    Instructor,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id"
    )]
    Class,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Adds a user to a class roster with the given role.
    pub async fn assign(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
        role: Role,
    ) -> Result<Self, DbErr> {
        let entry = ActiveModel {
            user_id: Set(user_id),
            class_id: Set(class_id),
            role: Set(role),
        };
        entry.insert(db).await
    }

    /// The role `user_id` holds in `class_id`, if any.
    pub async fn role_of(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<Role>, DbErr> {
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ClassId.eq(class_id))
            .one(db)
            .await?
            .map(|m| m.role))
    }

    pub async fn is_student(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
    ) -> Result<bool, DbErr> {
        Ok(Self::role_of(db, user_id, class_id).await? == Some(Role::Student))
    }

    pub async fn is_instructor(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
    ) -> Result<bool, DbErr> {
        Ok(Self::role_of(db, user_id, class_id).await? == Some(Role::Instructor))
    }

    /// Number of enrolled students (the roster size used for reporting).
    pub async fn student_count(db: &DatabaseConnection, class_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(Role::Student))
            .count(db)
            .await
    }

    /// All enrolled students of a class, for report rows.
    pub async fn students_of_class(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<super::user::Model>, DbErr> {
        let student_ids: Vec<i64> = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(Role::Student))
            .all(db)
            .await?
            .into_iter()
            .map(|r| r.user_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        super::user::Entity::find()
            .filter(super::user::Column::Id.is_in(student_ids))
            .all(db)
            .await
    }
}
