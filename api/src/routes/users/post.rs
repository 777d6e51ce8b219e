use axum::{Json, extract::State, http::StatusCode};
use sea_orm::SqlErr;
use serde::Deserialize;
use validator::Validate;

use db::models::user::Model as UserModel;

use crate::response::ApiResponse;
use crate::routes::common::UserResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub admin: Option<bool>,
}

/// POST `/api/users`
///
/// **Auth**: admin.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(common::format_validation_errors(&errors))),
        );
    }

    match UserModel::create(
        state.db(),
        &req.username,
        &req.email,
        &req.password,
        req.admin.unwrap_or(false),
    )
    .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(user.into(), "User created")),
        ),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Username or email already taken")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create user")),
            )
        }
    }
}
