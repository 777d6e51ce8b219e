use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use validator::Validate;

use services::actor::Actor;
use services::attendance_code::AttendanceCodeService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{AttendanceCodeResponse, ExtendCodeReq, reject};

/// PUT `/api/classes/{class_id}/sessions/{session_id}/attendance/code/extend`
///
/// Pushes the active code's deadline out in place; no new code is minted.
/// **Auth**: admin or class instructor.
pub async fn extend_code(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<ExtendCodeReq>,
) -> (StatusCode, Json<ApiResponse<AttendanceCodeResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    let now = Utc::now();
    let actor = Actor::new(claims.sub, claims.admin);

    match AttendanceCodeService::extend_expiration(
        state.db(),
        actor,
        class_id,
        session_id,
        req.additional_minutes,
        now,
    )
    .await
    {
        Ok(code) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AttendanceCodeResponse::from_code(code, now),
                "Attendance code extended",
            )),
        ),
        Err(e) => reject(e),
    }
}
