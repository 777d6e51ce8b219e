//! The code store: issuing, deactivating, listing and extending the
//! short-lived check-in codes of a session.

use chrono::{DateTime, Duration, Utc};
use db::models::attendance_code::{ActiveModel, Column, Entity, Model as AttendanceCode};
use db::models::class_session::Model as ClassSession;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::actor::Actor;
use crate::code_gen;
use crate::error::{AttendanceError, AttendanceResult};

/// How a new code should expire. `expiration_minutes` only applies with
/// `auto_expire`; an explicit `expires_at` only applies without it. Leaving
/// everything unset yields a code that never expires by time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCodeParams {
    pub auto_expire: bool,
    pub expiration_minutes: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct AttendanceCodeService;

impl AttendanceCodeService {
    /// Issues a new code for a session, retiring whatever code was active.
    ///
    /// Deactivation of the old code and insertion of the new one happen in
    /// one transaction, so concurrent calls still converge to exactly one
    /// active code per session.
    pub async fn create_code(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
        params: CreateCodeParams,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceCode> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;
        if !session.attendance_enabled {
            return Err(AttendanceError::AttendanceDisabled);
        }

        let expires_at = resolve_expiry(&params, now)?;
        let code_value = unused_code_value(db).await?;
        let issued_by = actor.user_id;
        let auto_expire = params.auto_expire;

        let created = db
            .transaction::<_, AttendanceCode, AttendanceError>(move |txn| {
                Box::pin(async move {
                    Entity::update_many()
                        .col_expr(Column::IsActive, Expr::value(false))
                        .col_expr(Column::UpdatedAt, Expr::value(now))
                        .filter(Column::SessionId.eq(session_id))
                        .filter(Column::IsActive.eq(true))
                        .exec(txn)
                        .await?;

                    let row = ActiveModel {
                        session_id: Set(session_id),
                        issued_by: Set(issued_by),
                        code: Set(code_value),
                        is_active: Set(true),
                        auto_expire: Set(auto_expire),
                        expires_at: Set(expires_at),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    Ok(row.insert(txn).await?)
                })
            })
            .await?;

        info!(
            session_id,
            code_id = created.id,
            issued_by,
            expires_at = ?created.expires_at,
            "issued attendance code"
        );
        Ok(created)
    }

    /// Deactivates the session's active code, if any. A no-op when nothing
    /// is active.
    pub async fn deactivate_code(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> AttendanceResult<()> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        let res = Entity::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::IsActive.eq(true))
            .exec(db)
            .await?;

        if res.rows_affected > 0 {
            info!(session_id, "deactivated attendance code");
        }
        Ok(())
    }

    /// The active, non-expired code for a session, or `None`. Issuer-facing;
    /// this is what renders on the instructor's screen.
    pub async fn get_current_code(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> AttendanceResult<Option<AttendanceCode>> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        Ok(active_row(db, session_id).await?.filter(|c| c.is_usable(now)))
    }

    /// Full issuing history for a session, newest first.
    pub async fn list_codes(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
    ) -> AttendanceResult<Vec<AttendanceCode>> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        Ok(Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await?)
    }

    /// Pushes the active code's deadline out by `additional_minutes`,
    /// anchored at the later of now and the current deadline. This is an
    /// in-place update; no new code is minted, so the history stays one
    /// row per issued code.
    pub async fn extend_expiration(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
        additional_minutes: i64,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceCode> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        if additional_minutes <= 0 {
            return Err(AttendanceError::InvalidExpiration(
                "extension must be a positive number of minutes".into(),
            ));
        }

        let code = active_row(db, session_id)
            .await?
            .ok_or(AttendanceError::NoActiveCode)?;

        let Some(current_deadline) = code.expires_at else {
            return Err(AttendanceError::InvalidExpiration(
                "code has no expiration to extend".into(),
            ));
        };

        let anchor = current_deadline.max(now);
        let new_deadline = anchor + Duration::minutes(additional_minutes);

        let code_id = code.id;
        let mut row = code.into_active_model();
        row.expires_at = Set(Some(new_deadline));
        row.updated_at = Set(now);
        let updated = row.update(db).await?;

        info!(
            session_id,
            code_id,
            expires_at = %new_deadline,
            "extended attendance code expiration"
        );
        Ok(updated)
    }
}

/// Scoped session lookup shared by the engine's entry points.
pub(crate) async fn load_session(
    db: &DatabaseConnection,
    class_id: i64,
    session_id: i64,
) -> AttendanceResult<ClassSession> {
    ClassSession::find_in_class(db, class_id, session_id)
        .await?
        .ok_or(AttendanceError::SessionNotFound)
}

/// The session's active row regardless of time expiry.
pub(crate) async fn active_row(
    db: &DatabaseConnection,
    session_id: i64,
) -> Result<Option<AttendanceCode>, sea_orm::DbErr> {
    Entity::find()
        .filter(Column::SessionId.eq(session_id))
        .filter(Column::IsActive.eq(true))
        .order_by_desc(Column::CreatedAt)
        .one(db)
        .await
}

fn resolve_expiry(
    params: &CreateCodeParams,
    now: DateTime<Utc>,
) -> AttendanceResult<Option<DateTime<Utc>>> {
    if params.auto_expire {
        let minutes = params
            .expiration_minutes
            .unwrap_or_else(common::config::default_code_expiry_minutes);
        if minutes <= 0 {
            return Err(AttendanceError::InvalidExpiration(
                "expiration must be a positive number of minutes".into(),
            ));
        }
        return Ok(Some(now + Duration::minutes(minutes)));
    }

    match params.expires_at {
        Some(deadline) if deadline <= now => Err(AttendanceError::InvalidExpiration(
            "expiration must lie in the future".into(),
        )),
        // None means the code never expires by time; it can still be
        // deactivated explicitly.
        other => Ok(other),
    }
}

/// Draws codes until one does not collide with any currently-active code.
async fn unused_code_value(db: &DatabaseConnection) -> AttendanceResult<String> {
    loop {
        let candidate = code_gen::generate();
        let taken = Entity::find()
            .filter(Column::Code.eq(&candidate))
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
    }
}
