use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod attendance;
mod common;
mod get;
mod post;

pub use get::list_sessions;
pub use post::{assign_role, create_class, create_session};

pub fn classes_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class))
        .route("/{class_id}/roster", post(assign_role))
        .route(
            "/{class_id}/sessions",
            post(create_session).get(list_sessions),
        )
        .nest(
            "/{class_id}/sessions/{session_id}/attendance",
            attendance::attendance_routes(),
        )
}
