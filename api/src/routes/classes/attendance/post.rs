//! Attendance mutation routes: issue a code, check in.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use validator::Validate;

use services::actor::Actor;
use services::attendance_code::{AttendanceCodeService, CreateCodeParams};
use services::check_in::CheckInService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{
    AttendanceCodeResponse, AttendanceRecordResponse, CheckInReq, CreateCodeReq, reject,
};

/// POST `/api/classes/{class_id}/sessions/{session_id}/attendance/code`
///
/// Issues a new code and retires the previous one. **Auth**: admin or
/// class instructor.
pub async fn create_code(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateCodeReq>,
) -> (StatusCode, Json<ApiResponse<AttendanceCodeResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    let now = Utc::now();
    let actor = Actor::new(claims.sub, claims.admin);
    let params = CreateCodeParams {
        auto_expire: req.auto_expire.unwrap_or(false),
        expiration_minutes: req.expiration_minutes,
        expires_at: req.expires_at,
    };

    match AttendanceCodeService::create_code(state.db(), actor, class_id, session_id, params, now)
        .await
    {
        Ok(code) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceCodeResponse::from_code(code, now),
                "Attendance code created",
            )),
        ),
        Err(e) => reject(e),
    }
}

/// POST `/api/classes/{class_id}/sessions/{session_id}/attendance/check-in`
///
/// Redeems the submitted code for the calling student. **Auth**: any
/// authenticated user; the engine rejects callers who are not enrolled
/// students.
pub async fn check_in(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CheckInReq>,
) -> (StatusCode, Json<ApiResponse<AttendanceRecordResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    let now = Utc::now();

    match CheckInService::check_in(state.db(), class_id, session_id, claims.sub, &req.code, now)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(record.into(), "Attendance recorded")),
        ),
        Err(e) => reject(e),
    }
}
