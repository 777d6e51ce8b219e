use axum::{Json, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::models::attendance_code::{Model as AttendanceCode, TimeRemaining};
use db::models::attendance_record::Model as AttendanceRecord;
use services::error::AttendanceError;
use services::reporting::{ReportRow, ReportStatus, SessionStats};

use crate::response::ApiResponse;

#[derive(Debug, Serialize, Default)]
pub struct AttendanceCodeResponse {
    pub id: i64,
    pub session_id: i64,
    pub issued_by: i64,
    pub code: String,
    pub is_active: bool,
    pub auto_expire: bool,
    pub expires_at: Option<String>,
    /// None for codes with no time-based expiry.
    pub seconds_remaining: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl AttendanceCodeResponse {
    pub fn from_code(m: AttendanceCode, now: DateTime<Utc>) -> Self {
        let seconds_remaining = match m.time_remaining(now) {
            TimeRemaining::Unlimited => None,
            TimeRemaining::Remaining(d) => Some(d.num_seconds()),
        };
        Self {
            id: m.id,
            session_id: m.session_id,
            issued_by: m.issued_by,
            code: m.code,
            is_active: m.is_active,
            auto_expire: m.auto_expire,
            expires_at: m.expires_at.map(|t| t.to_rfc3339()),
            seconds_remaining,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceRecordResponse {
    pub session_id: i64,
    pub user_id: i64,
    pub status: String,
    pub checked_in_at: String,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(m: AttendanceRecord) -> Self {
        Self {
            session_id: m.session_id,
            user_id: m.user_id,
            status: m.status.to_string(),
            checked_in_at: m.checked_in_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct StatsResponse {
    pub total_students: u64,
    pub present_count: u64,
    pub late_count: u64,
    pub absent_count: u64,
}

impl From<SessionStats> for StatsResponse {
    fn from(s: SessionStats) -> Self {
        Self {
            total_students: s.total_students,
            present_count: s.present_count,
            late_count: s.late_count,
            absent_count: s.absent_count,
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct ReportRowResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub status: String,
    pub checked_in_at: Option<String>,
}

impl From<ReportRow> for ReportRowResponse {
    fn from(r: ReportRow) -> Self {
        let status = match r.status {
            ReportStatus::Present => "present",
            ReportStatus::Late => "late",
            ReportStatus::Absent => "absent",
        };
        Self {
            user_id: r.user_id,
            username: r.username,
            email: r.email,
            status: status.to_string(),
            checked_in_at: r.checked_in_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCodeReq {
    pub auto_expire: Option<bool>,
    #[validate(range(min = 1, max = 1440, message = "expiration_minutes must be 1-1440"))]
    pub expiration_minutes: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExtendCodeReq {
    #[validate(range(min = 1, max = 1440, message = "additional_minutes must be 1-1440"))]
    pub additional_minutes: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckInReq {
    #[validate(length(min = 1, max = 16, message = "code is required"))]
    pub code: String,
}

/// Maps an engine rejection onto an HTTP response. Storage failures are
/// logged and collapsed into a generic retryable message.
pub fn reject<T>(err: AttendanceError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    use AttendanceError::*;

    let status = match &err {
        NotAuthorized | NotEnrolled => StatusCode::FORBIDDEN,
        SessionNotFound => StatusCode::NOT_FOUND,
        InvalidExpiration(_) | AttendanceDisabled | NoActiveCode | CodeExpired | CodeMismatch
        | AlreadyCheckedIn => StatusCode::BAD_REQUEST,
        RosterInconsistent | Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        Storage(e) => {
            tracing::error!(error = %e, "storage failure in attendance engine");
            "A storage error occurred; please retry".to_string()
        }
        other => other.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}
