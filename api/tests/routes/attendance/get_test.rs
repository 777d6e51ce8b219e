use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use api::auth::generate_jwt;
use db::models::class_role::{Model as ClassRoleModel, Role};
use db::models::class_session::Model as SessionModel;
use db::models::user::Model as UserModel;

use crate::helpers::{make_test_app, seed};

use super::{attendance_uri, expect_status, json_request};

#[tokio::test]
async fn current_code_round_trips_and_clears_on_deactivation() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");

    // nothing issued yet
    let empty = expect_status(
        app.clone(),
        json_request("GET", &code_uri, &token, None),
        StatusCode::OK,
    )
    .await;
    assert!(empty["data"].is_null());

    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;

    let current = expect_status(
        app.clone(),
        json_request("GET", &code_uri, &token, None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(current["data"]["code"], created["data"]["code"]);
    // no auto-expiry requested, so the code is unlimited
    assert!(current["data"]["seconds_remaining"].is_null());

    expect_status(
        app.clone(),
        json_request("DELETE", &code_uri, &token, None),
        StatusCode::OK,
    )
    .await;

    let after = expect_status(
        app,
        json_request("GET", &code_uri, &token, None),
        StatusCode::OK,
    )
    .await;
    assert!(after["data"].is_null());
}

#[tokio::test]
async fn students_may_not_read_the_current_code() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.student.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    expect_status(
        app,
        json_request("GET", &uri, &token, None),
        StatusCode::FORBIDDEN,
    )
    .await;
}

#[tokio::test]
async fn status_reflects_own_check_in() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (stud_token, _) = generate_jwt(ctx.student.id, false);
    let status_uri = attendance_uri(ctx.class.id, ctx.session.id, "status");

    let before = expect_status(
        app.clone(),
        json_request("GET", &status_uri, &stud_token, None),
        StatusCode::OK,
    )
    .await;
    assert!(before["data"].is_null());
    assert_eq!(before["message"], "Not checked in");

    let (inst_token, _) = generate_jwt(ctx.instructor.id, false);
    let code_uri = attendance_uri(ctx.class.id, ctx.session.id, "code");
    let created = expect_status(
        app.clone(),
        json_request("POST", &code_uri, &inst_token, Some(json!({}))),
        StatusCode::CREATED,
    )
    .await;
    let code = created["data"]["code"].as_str().unwrap().to_string();

    let check_in_uri = attendance_uri(ctx.class.id, ctx.session.id, "check-in");
    expect_status(
        app.clone(),
        json_request("POST", &check_in_uri, &stud_token, Some(json!({ "code": code }))),
        StatusCode::OK,
    )
    .await;

    let after = expect_status(
        app,
        json_request("GET", &status_uri, &stud_token, None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(after["data"]["user_id"], ctx.student.id);
    assert_eq!(after["data"]["status"], "present");
}

#[tokio::test]
async fn stats_and_report_derive_absences_from_the_roster() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let db = state.db();

    // roster of three: present, late, absent
    let late_student = UserModel::create(db, "amelia", "amelia@test.dev", "password", false)
        .await
        .unwrap();
    let absent_student = UserModel::create(db, "zach", "zach@test.dev", "password", false)
        .await
        .unwrap();
    for u in [&late_student, &absent_student] {
        ClassRoleModel::assign(db, u.id, ctx.class.id, Role::Student)
            .await
            .unwrap();
    }

    let timed = SessionModel::create(
        db,
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

    // both check in an hour after start: LATE for each
    let check_in_uri = attendance_uri(ctx.class.id, timed.id, "check-in");
    for user in [&ctx.student, &late_student] {
        let (token, _) = generate_jwt(user.id, false);
        expect_status(
            app.clone(),
            json_request("POST", &check_in_uri, &token, Some(json!({ "code": code }))),
            StatusCode::OK,
        )
        .await;
    }

    let stats_uri = attendance_uri(ctx.class.id, timed.id, "stats");
    let stats = expect_status(
        app.clone(),
        json_request("GET", &stats_uri, &inst_token, None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total_students"], 3);
    assert_eq!(stats["data"]["present_count"], 0);
    assert_eq!(stats["data"]["late_count"], 2);
    assert_eq!(stats["data"]["absent_count"], 1);

    let report_uri = attendance_uri(ctx.class.id, timed.id, "report");
    let report = expect_status(
        app,
        json_request("GET", &report_uri, &inst_token, None),
        StatusCode::OK,
    )
    .await;
    let rows = report["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    // ordered by username: amelia, stud, zach
    assert_eq!(rows[0]["username"], "amelia");
    assert_eq!(rows[0]["status"], "late");
    assert_eq!(rows[1]["username"], "stud");
    assert_eq!(rows[1]["status"], "late");
    assert_eq!(rows[2]["username"], "zach");
    assert_eq!(rows[2]["status"], "absent");
    assert!(rows[2]["checked_in_at"].is_null());
}

#[tokio::test]
async fn stats_on_an_empty_roster_are_all_zeros() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;
    let db = state.db();

    let empty_class = db::models::class::Model::create(db, "EMPTY1", "Nobody", None)
        .await
        .unwrap();
    ClassRoleModel::assign(db, ctx.instructor.id, empty_class.id, Role::Instructor)
        .await
        .unwrap();
    let session = SessionModel::create(db, empty_class.id, "Empty", true, None, None, None)
        .await
        .unwrap();

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(empty_class.id, session.id, "stats");
    let stats = expect_status(
        app,
        json_request("GET", &uri, &token, None),
        StatusCode::OK,
    )
    .await;
    assert_eq!(stats["data"]["total_students"], 0);
    assert_eq!(stats["data"]["present_count"], 0);
    assert_eq!(stats["data"]["late_count"], 0);
    assert_eq!(stats["data"]["absent_count"], 0);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let (app, state) = make_test_app().await;
    let ctx = seed(state.db()).await;

    let (token, _) = generate_jwt(ctx.instructor.id, false);
    let uri = attendance_uri(ctx.class.id, ctx.session.id + 999_999, "stats");
    expect_status(
        app,
        json_request("GET", &uri, &token, None),
        StatusCode::NOT_FOUND,
    )
    .await;
}
