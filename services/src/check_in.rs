//! The check-in processor: validates a student's submitted code against
//! the session's active code and records attendance exactly once.

use chrono::{DateTime, Duration, Utc};
use db::models::attendance_code::{Column as CodeColumn, Entity as CodeEntity};
use db::models::attendance_record::{
    ActiveModel, AttendanceStatus, Entity as RecordEntity, Model as AttendanceRecord,
};
use db::models::class_role::{Column as RoleColumn, Entity as RoleEntity, Role};
use db::models::class_session::Model as ClassSession;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use tracing::info;

use crate::attendance_code::load_session;
use crate::error::{AttendanceError, AttendanceResult};

pub struct CheckInService;

impl CheckInService {
    /// Records attendance for `user_id` on a session, given the code they
    /// typed in.
    ///
    /// Validation and insert run in one transaction, and the record
    /// table's `(session_id, user_id)` primary key backs the
    /// at-most-one-check-in invariant: when two submissions race past the
    /// duplicate check, the second insert fails the constraint and is
    /// reported as [`AttendanceError::AlreadyCheckedIn`].
    pub async fn check_in(
        db: &DatabaseConnection,
        class_id: i64,
        session_id: i64,
        user_id: i64,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceRecord> {
        let session = load_session(db, class_id, session_id).await?;
        if !session.attendance_enabled {
            return Err(AttendanceError::AttendanceDisabled);
        }

        let submitted = submitted_code.trim().to_owned();
        let status = classify(&session, now);
        let session_class_id = session.class_id;

        let record = db
            .transaction::<_, AttendanceRecord, AttendanceError>(move |txn| {
                Box::pin(async move {
                    let current = CodeEntity::find()
                        .filter(CodeColumn::SessionId.eq(session_id))
                        .filter(CodeColumn::IsActive.eq(true))
                        .order_by_desc(CodeColumn::CreatedAt)
                        .one(txn)
                        .await?
                        .ok_or(AttendanceError::NoActiveCode)?;

                    if !current.is_usable(now) {
                        return Err(AttendanceError::CodeExpired);
                    }
                    // the UI upper-cases input, but don't rely on it
                    if !current.code.eq_ignore_ascii_case(&submitted) {
                        return Err(AttendanceError::CodeMismatch);
                    }

                    if RecordEntity::find_by_id((session_id, user_id))
                        .one(txn)
                        .await?
                        .is_some()
                    {
                        return Err(AttendanceError::AlreadyCheckedIn);
                    }

                    let enrolled = RoleEntity::find()
                        .filter(RoleColumn::UserId.eq(user_id))
                        .filter(RoleColumn::ClassId.eq(session_class_id))
                        .filter(RoleColumn::Role.eq(Role::Student))
                        .one(txn)
                        .await?
                        .is_some();
                    if !enrolled {
                        return Err(AttendanceError::NotEnrolled);
                    }

                    let row = ActiveModel {
                        session_id: Set(session_id),
                        user_id: Set(user_id),
                        attendance_code_id: Set(current.id),
                        status: Set(status),
                        checked_in_at: Set(now),
                    };
                    match row.insert(txn).await {
                        Ok(rec) => Ok(rec),
                        Err(e) => match e.sql_err() {
                            Some(SqlErr::UniqueConstraintViolation(_)) => {
                                Err(AttendanceError::AlreadyCheckedIn)
                            }
                            _ => Err(e.into()),
                        },
                    }
                })
            })
            .await?;

        info!(
            session_id,
            user_id,
            status = %record.status,
            "attendance recorded"
        );
        Ok(record)
    }

    /// The caller's own record for a session, if they have checked in.
    pub async fn my_status(
        db: &DatabaseConnection,
        class_id: i64,
        session_id: i64,
        user_id: i64,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        load_session(db, class_id, session_id).await?;
        Ok(AttendanceRecord::find_for(db, session_id, user_id).await?)
    }
}

/// LATE iff the check-in lands strictly past start + threshold. Without a
/// configured start or threshold everyone is PRESENT.
fn classify(session: &ClassSession, now: DateTime<Utc>) -> AttendanceStatus {
    match (session.attendance_start_time, session.late_threshold_minutes) {
        (Some(start), Some(threshold)) if now - start > Duration::minutes(i64::from(threshold)) => {
            AttendanceStatus::Late
        }
        _ => AttendanceStatus::Present,
    }
}
