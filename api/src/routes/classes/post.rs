use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use sea_orm::{EntityTrait, SqlErr};
use serde::Deserialize;
use validator::Validate;

use db::models::class::Model as ClassModel;
use db::models::class_role::{Model as ClassRoleModel, Role};
use db::models::class_session::Model as SessionModel;
use db::models::user::Entity as UserEntity;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::common::{ClassResponse, SessionResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 2, max = 16, message = "code must be 2-16 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
}

/// POST `/api/classes`
///
/// **Auth**: admin.
pub async fn create_class(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateClassRequest>,
) -> (StatusCode, Json<ApiResponse<ClassResponse>>) {
    if !claims.admin {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Only admins may create classes")),
        );
    }
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    match ClassModel::create(state.db(), &req.code, &req.title, req.description.as_deref()).await {
        Ok(class) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(class.into(), "Class created")),
        ),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("A class with this code already exists")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create class");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create class")),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: i64,
    pub role: Role,
}

/// POST `/api/classes/{class_id}/roster`
///
/// Adds a user to the class roster. **Auth**: admin or class instructor.
pub async fn assign_role(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<AssignRoleRequest>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "Only admins or the class instructor may manage the roster",
            )),
        );
    }

    match db::models::Class::find_by_id(class_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Class not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "class lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("A storage error occurred; please retry")),
            );
        }
    }

    match UserEntity::find_by_id(req.user_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("User not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("A storage error occurred; please retry")),
            );
        }
    }

    match ClassRoleModel::assign(db, req.user_id, class_id, req.role).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ApiResponse::success((), "Role assigned")),
        ),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("User already has a role in this class")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to assign role");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to assign role")),
            )
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    pub attendance_enabled: Option<bool>,
    pub attendance_start_time: Option<DateTime<Utc>>,
    pub attendance_end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 1440, message = "late_threshold_minutes must be 0-1440"))]
    pub late_threshold_minutes: Option<i32>,
}

/// POST `/api/classes/{class_id}/sessions`
///
/// **Auth**: admin or class instructor.
pub async fn create_session(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<CreateSessionRequest>,
) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    let db = state.db();

    if !can_manage_class(db, &claims, class_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "Only admins or the class instructor may create sessions",
            )),
        );
    }
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    match db::models::Class::find_by_id(class_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Class not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "class lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("A storage error occurred; please retry")),
            );
        }
    }

    match SessionModel::create(
        db,
        class_id,
        &req.title,
        req.attendance_enabled.unwrap_or(false),
        req.attendance_start_time,
        req.attendance_end_time,
        req.late_threshold_minutes,
    )
    .await
    {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(session.into(), "Session created")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create session")),
            )
        }
    }
}

/// Admins manage everything; instructors only their own classes.
pub(super) async fn can_manage_class(
    db: &sea_orm::DatabaseConnection,
    claims: &crate::auth::Claims,
    class_id: i64,
) -> bool {
    if claims.admin {
        return true;
    }
    ClassRoleModel::is_instructor(db, claims.sub, class_id)
        .await
        .unwrap_or(false)
}
