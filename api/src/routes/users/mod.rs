use axum::{Router, routing::post};

use crate::state::AppState;

mod post;

pub use post::create_user;

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}
