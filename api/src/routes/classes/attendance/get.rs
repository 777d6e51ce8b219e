//! Attendance read routes: current code, code history, own status,
//! session stats, per-student report.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use services::actor::Actor;
use services::attendance_code::AttendanceCodeService;
use services::check_in::CheckInService;
use services::reporting::ReportingService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{
    AttendanceCodeResponse, AttendanceRecordResponse, ReportRowResponse, StatsResponse, reject,
};

/// GET `/api/classes/{class_id}/sessions/{session_id}/attendance/code`
///
/// The current usable code, or `null` when none is active.
///
/// **Auth**: admin or class instructor (the code is the secret).
pub async fn get_current_code(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Option<AttendanceCodeResponse>>>) {
    let now = Utc::now();
    let actor = Actor::new(claims.sub, claims.admin);

    match AttendanceCodeService::get_current_code(state.db(), actor, class_id, session_id, now)
        .await
    {
        Ok(Some(code)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(AttendanceCodeResponse::from_code(code, now)),
                "Current attendance code",
            )),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse::success(None, "No active attendance code")),
        ),
        Err(e) => reject(e),
    }
}

/// GET `/api/classes/{class_id}/sessions/{session_id}/attendance/codes`
///
/// Full issuing history, newest first. **Auth**: admin or class instructor.
pub async fn list_codes(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<AttendanceCodeResponse>>>) {
    let now = Utc::now();
    let actor = Actor::new(claims.sub, claims.admin);

    match AttendanceCodeService::list_codes(state.db(), actor, class_id, session_id).await {
        Ok(codes) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                codes
                    .into_iter()
                    .map(|c| AttendanceCodeResponse::from_code(c, now))
                    .collect(),
                "Attendance code history",
            )),
        ),
        Err(e) => reject(e),
    }
}

/// GET `/api/classes/{class_id}/sessions/{session_id}/attendance/status`
///
/// The caller's own attendance record, or `null` if they have not
/// checked in. **Auth**: any authenticated user.
pub async fn my_status(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Option<AttendanceRecordResponse>>>) {
    match CheckInService::my_status(state.db(), class_id, session_id, claims.sub).await {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(record.into()),
                "Attendance status",
            )),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse::success(None, "Not checked in")),
        ),
        Err(e) => reject(e),
    }
}

/// GET `/api/classes/{class_id}/sessions/{session_id}/attendance/stats`
///
/// Present/late/absent counts against the roster. **Auth**: admin or
/// class instructor.
pub async fn get_stats(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<StatsResponse>>) {
    let actor = Actor::new(claims.sub, claims.admin);

    match ReportingService::get_stats(state.db(), actor, class_id, session_id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(stats.into(), "Attendance statistics")),
        ),
        Err(e) => reject(e),
    }
}

/// GET `/api/classes/{class_id}/sessions/{session_id}/attendance/report`
///
/// One row per enrolled student, including derived absents. **Auth**:
/// admin or class instructor.
pub async fn get_report(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<ReportRowResponse>>>) {
    let actor = Actor::new(claims.sub, claims.admin);

    match ReportingService::get_report(state.db(), actor, class_id, session_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(ReportRowResponse::from).collect(),
                "Attendance report",
            )),
        ),
        Err(e) => reject(e),
    }
}
