use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use services::actor::Actor;
use services::attendance_code::AttendanceCodeService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::reject;

/// DELETE `/api/classes/{class_id}/sessions/{session_id}/attendance/code`
///
/// Deactivates the active code. Idempotent: succeeds even when nothing is
/// active. **Auth**: admin or class instructor.
pub async fn deactivate_code(
    State(state): State<AppState>,
    Path((class_id, session_id)): Path<(i64, i64)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let now = Utc::now();
    let actor = Actor::new(claims.sub, claims.admin);

    match AttendanceCodeService::deactivate_code(state.db(), actor, class_id, session_id, now)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Attendance code deactivated")),
        ),
        Err(e) => reject(e),
    }
}
