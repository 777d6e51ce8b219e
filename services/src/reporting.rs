//! Read models over attendance records: per-session statistics and the
//! per-student report.
//!
//! Absence is always derived against the roster at read time; nothing in
//! the engine writes an "absent" row.

use chrono::{DateTime, Utc};
use db::models::attendance_record::{
    AttendanceStatus, Column as RecordColumn, Entity as RecordEntity,
};
use db::models::class_role;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use tracing::warn;

use crate::actor::Actor;
use crate::attendance_code::load_session;
use crate::error::{AttendanceError, AttendanceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total_students: u64,
    pub present_count: u64,
    pub late_count: u64,
    pub absent_count: u64,
}

/// Status as shown in reports; unlike the persisted enum this includes
/// the derived `absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Present,
    Late,
    Absent,
}

impl From<AttendanceStatus> for ReportStatus {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => ReportStatus::Present,
            AttendanceStatus::Late => ReportStatus::Late,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub status: ReportStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
}

pub struct ReportingService;

impl ReportingService {
    /// Present/late/absent counts for a session against the enrolled
    /// roster. An empty roster yields all zeros; more records than roster
    /// members is a data-integrity failure, not something to clamp away.
    pub async fn get_stats(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
    ) -> AttendanceResult<SessionStats> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        let total_students = class_role::Model::student_count(db, session.class_id).await?;
        let present_count = count_by_status(db, session_id, AttendanceStatus::Present).await?;
        let late_count = count_by_status(db, session_id, AttendanceStatus::Late).await?;

        if present_count + late_count > total_students {
            warn!(
                session_id,
                total_students,
                present_count,
                late_count,
                "attendance records exceed roster size"
            );
            return Err(AttendanceError::RosterInconsistent);
        }

        Ok(SessionStats {
            total_students,
            present_count,
            late_count,
            absent_count: total_students - present_count - late_count,
        })
    }

    /// One row per enrolled student, ordered by username. Students with no
    /// record appear as `absent` with no check-in time.
    pub async fn get_report(
        db: &DatabaseConnection,
        actor: Actor,
        class_id: i64,
        session_id: i64,
    ) -> AttendanceResult<Vec<ReportRow>> {
        let session = load_session(db, class_id, session_id).await?;
        actor.ensure_can_manage(db, &session).await?;

        let mut students = class_role::Model::students_of_class(db, session.class_id).await?;
        students.sort_by(|a, b| a.username.cmp(&b.username));

        let records = RecordEntity::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .all(db)
            .await?;
        let by_user: std::collections::HashMap<i64, _> =
            records.into_iter().map(|r| (r.user_id, r)).collect();

        Ok(students
            .into_iter()
            .map(|student| match by_user.get(&student.id) {
                Some(rec) => ReportRow {
                    user_id: student.id,
                    username: student.username,
                    email: student.email,
                    status: rec.status.into(),
                    checked_in_at: Some(rec.checked_in_at),
                },
                None => ReportRow {
                    user_id: student.id,
                    username: student.username,
                    email: student.email,
                    status: ReportStatus::Absent,
                    checked_in_at: None,
                },
            })
            .collect())
    }
}

async fn count_by_status(
    db: &DatabaseConnection,
    session_id: i64,
    status: AttendanceStatus,
) -> Result<u64, sea_orm::DbErr> {
    RecordEntity::find()
        .filter(RecordColumn::SessionId.eq(session_id))
        .filter(RecordColumn::Status.eq(status))
        .count(db)
        .await
}
