use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

use api::auth::generate_jwt;
use db::models::class_session::Model as SessionModel;
use db::models::user::Model as UserModel;

use crate::helpers::make_test_app;
use crate::helpers::seed;

use super::{attendance_uri, expect_status, json_request};

#[tokio::test]
async fn instructor_creates_code_with_auto_expiry() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let body = json!({ "auto_expire": true, "expiration_minutes": 30 });

    let json = expect_status(
        app,
        json_request("POST", &uri, &token, Some(body)),
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Attendance code created");
    let code = json["data"]["code"].as_str().expect("code present");
    assert_eq!(code.len(), 8);
    assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    let remaining = json["data"]["seconds_remaining"].as_i64().unwrap();
    assert!((0..=1800).contains(&remaining));
}

#[tokio::test]
async fn issuing_again_retires_the_previous_code() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");

    let first = expect_status(
        app.clone(),
        json_request("POST", &uri, &token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let second = expect_status(
        app.clone(),
        json_request("POST", &uri, &token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    assert_ne!(first["data"]["id"], second["data"]["id"]);

    let history_uri = attendance_uri(ctx.class.id, ctx.session.id, "codes");
    let history = expect_status(
        app,
        json_request("GET", &history_uri, &token, None),
        StatusCode::OK,
    )
    .await;
    let rows = history["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let active: Vec<_> = rows.iter().filter(|r| r["is_active"] == true).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], second["data"]["id"]);
}

#[tokio::test]
async fn students_may_not_issue_codes() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");

    let json = expect_status(
        app,
        json_request("POST", &uri, &token, Some(json!({}))),
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(&uri)
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{}"))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn student_checks_in_with_the_current_code() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let code = created["data"]["code"].as_str().unwrap().to_string();

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");

    let json = expect_status(
        app.clone(),
        json_request("POST", &uri, &stud_token, Some(json!({ "code": code }))),
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["message"], "Attendance recorded");
    assert_eq!(json["data"]["status"], "present");
    assert_eq!(json["data"]["user_id"], ctx.student.id);

    // second submission must be rejected
    let dup = expect_status(
        app,
        json_request("POST", &uri, &stud_token, Some(json!({ "code": code }))),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(
        dup["message"]
            .as_str()
            .unwrap()
            .contains("already recorded")
    );
}

#[tokio::test]
async fn check_in_accepts_lowercase_and_padded_codes() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let code = created["data"]["code"].as_str().unwrap().to_lowercase();

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");
    expect_status(
        app,
        json_request(
            "POST",
            &uri,
            &stud_token,
            Some(json!({ "code": format!("  {code}  ") })),
        ),
        StatusCode::OK,
    )
    .await;
}

#[tokio::test]
async fn wrong_code_is_rejected() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");
    let json = expect_status(
        app,
        json_request("POST", &uri, &stud_token, Some(json!({ "code": "WRONG123" }))),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["message"].as_str().unwrap().contains("does not match"));
}

#[tokio::test]
async fn check_in_without_any_code_issued_is_rejected() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");
    let json = expect_status(
        app,
        json_request("POST", &uri, &stud_token, Some(json!({ "code": "ANYTHING" }))),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(json["message"].as_str().unwrap().contains("No active"));
}

#[tokio::test]
async fn outsiders_cannot_check_in() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let code = created["data"]["code"].as_str().unwrap().to_string();

    let stranger = UserModel::create(state.db(), "ghost", "ghost@test.dev", "password", false)
        .await
        .unwrap();
    let (token, _) = generate_jwt(stranger.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");
    expect_status(
        app,
        json_request("POST", &uri, &token, Some(json!({ "code": code }))),
        StatusCode::FORBIDDEN,
    )
    .await;
}

#[tokio::test]
async fn late_threshold_classifies_check_in() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    // session that started an hour ago with a 15 minute grace period
    let timed = SessionModel::create(
        state.db(),
        ctx.class.id,
        "Started earlier",
        true,
        Some(Utc::now() - Duration::hours(1)),
        None,
        Some(15),
    )
    .await
    .unwrap();

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, timed.id, "code");
    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let code = created["data"]["code"].as_str().unwrap().to_string();

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, timed.id, "check-in");
    let json = expect_status(
        app,
        json_request("POST", &uri, &stud_token, Some(json!({ "code": code }))),
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["status"], "late");
}

#[tokio::test]
async fn missing_code_field_is_unprocessable() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");

    let req = json_request("POST", &uri, &stud_token, Some(json!({})));
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn session_from_another_class_is_not_found() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let other = db::models::class::Model::create(state.db(), "OTHER1", "Other class", None)
        .await
        .unwrap();

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    // session id belongs to ctx.class, path says `other`
    let uri = attendance_uri(other.id, ctx.session.id, "code");
    expect_status(
        app,
        json_request("POST", &uri, &inst_token, Some(json!({}))),
        StatusCode::NOT_FOUND,
    )
    .await;
}
