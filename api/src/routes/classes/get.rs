use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use db::models::class_role::Model as ClassRoleModel;
use db::models::class_session::Model as SessionModel;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::SessionResponse;

/// GET `/api/classes/{class_id}/sessions`
///
/// Lists a class's sessions, newest first.
///
/// **Auth**: admin or anyone on the class roster.
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    let db = state.db();

    let on_roster = ClassRoleModel::role_of(db, claims.sub, class_id)
        .await
        .ok()
        .flatten()
        .is_some();
    if !claims.admin && !on_roster {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Not a member of this class")),
        );
    }

    match SessionModel::list_for_class(db, class_id).await {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                sessions.into_iter().map(SessionResponse::from).collect(),
                "Sessions retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list sessions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to list sessions")),
            )
        }
    }
}
