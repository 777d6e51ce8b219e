use axum::http::StatusCode;
use serde_json::json;

use api::auth::generate_jwt;

use crate::helpers::{make_test_app, seed};

use super::{attendance_uri, expect_status, json_request};

#[tokio::test]
async fn deactivation_is_idempotent() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");

    // nothing active yet: still succeeds
    expect_status(
        app.clone(),
        json_request("DELETE", &uri, &token, None),
        StatusCode::OK,
    )
    .await;

    expect_status(
        app.clone(),
        json_request("POST", &uri, &token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;

    for _ in 0..2 {
        let json = expect_status(
            app.clone(),
            json_request("DELETE", &uri, &token, None),
            StatusCode::OK,
        )
        .await;
        assert_eq!(json["message"], "Attendance code deactivated");
    }
}

#[tokio::test]
async fn students_may_not_deactivate_codes() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    expect_status(
        app.clone(),
        json_request("POST", &uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    expect_status(
        app,
        json_request("DELETE", &uri, &stud_token, None),
        StatusCode::FORBIDDEN,
    )
    .await;
}

#[tokio::test]
async fn admins_may_deactivate_any_session_code() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let admin = db::models::user::Model::create(state.db(), "root", "root@test.dev", "password", true)
        .await
        .unwrap();

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    expect_status(
        app.clone(),
        json_request("POST", &uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;

    let (admin_token, _) = generate_jwt(admin.id, true);
    expect_status(
        app.clone(),
        json_request("DELETE", &uri, &admin_token, None),
        StatusCode::OK,
    )
    .await;

    let current = expect_status(
        app,
        json_request("GET", &uri, &inst_token, None),
        StatusCode::OK,
    )
    .await;
    assert!(current["data"].is_null());
}
