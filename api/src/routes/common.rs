//! DTOs shared across route groups.

use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::user::Model> for UserResponse {
    fn from(m: db::models::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            admin: m.admin,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}
