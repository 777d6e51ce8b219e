use db::models::{class_role, class_session};
use sea_orm::DatabaseConnection;

use crate::error::{AttendanceError, AttendanceResult};

/// The authenticated caller of an engine operation. Constructed by the
/// transport layer from verified credentials and passed in explicitly.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: i64,
    pub admin: bool,
}

impl Actor {
    pub fn new(user_id: i64, admin: bool) -> Self {
        Self { user_id, admin }
    }

    /// Admins may manage any session; otherwise the actor must be an
    /// instructor of the session's class.
    pub async fn ensure_can_manage(
        &self,
        db: &DatabaseConnection,
        session: &class_session::Model,
    ) -> AttendanceResult<()> {
        if self.admin {
            return Ok(());
        }
        if class_role::Model::is_instructor(db, self.user_id, session.class_id).await? {
            return Ok(());
        }
        Err(AttendanceError::NotAuthorized)
    }
}
