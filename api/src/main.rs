use api::routes::routes;
use api::state::AppState;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    let _log_guard = common::logger::init_logging(
        &common::config::log_file(),
        &common::config::log_level(),
        common::config::log_to_stdout(),
    );

    let db = db::connect().await;
    let app_state = AppState::new(db);

    let cors = CorsLayer::very_permissive();

    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", common::config::host(), common::config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}",
        common::config::project_name(),
        addr
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Server crashed");
}
