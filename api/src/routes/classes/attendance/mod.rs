use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

mod common;
mod delete;
mod get;
mod post;
mod put;

pub use delete::deactivate_code;
pub use get::{get_current_code, get_report, get_stats, list_codes, my_status};
pub use post::{check_in, create_code};
pub use put::extend_code;

/// Routes nested under
/// `/api/classes/{class_id}/sessions/{session_id}/attendance`.
///
/// Authentication is enforced by the parent router; per-operation
/// authorization (issuer vs. student) happens inside the engine against
/// the explicit actor.
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/code",
            post(create_code).get(get_current_code).delete(deactivate_code),
        )
        .route("/code/extend", put(extend_code))
        .route("/codes", get(list_codes))
        .route("/check-in", post(check_in))
        .route("/status", get(my_status))
        .route("/stats", get(get_stats))
        .route("/report", get(get_report))
}
