use api::routes::routes;
use api::state::AppState;
use axum::Router;
use db::models::{
    class::Model as ClassModel,
    class_role::{Model as ClassRoleModel, Role},
    class_session::Model as SessionModel,
    user::Model as UserModel,
};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;

/// A fresh app over an in-memory database with the real migrations.
pub async fn make_test_app() -> (Router, AppState) {
    let db = setup_test_db().await;
    let app_state = AppState::new(db);
    let app = Router::new().nest("/api", routes(app_state.clone()));
    (app, app_state)
}

pub struct TestCtx {
    pub class: ClassModel,
    pub instructor: UserModel,
    pub student: UserModel,
    pub session: SessionModel,
}

/// One class with an instructor, an enrolled student, and an
/// attendance-enabled session.
pub async fn seed(db: &DatabaseConnection) -> TestCtx {
    let class = ClassModel::create(db, "RUST101", "Intro to Rust", None)
        .await
        .expect("create class");
    let instructor = UserModel::create(db, "inst", "inst@test.dev", "password", false)
        .await
        .expect("create instructor");
    let student = UserModel::create(db, "stud", "stud@test.dev", "password", false)
        .await
        .expect("create student");

    ClassRoleModel::assign(db, instructor.id, class.id, Role::Instructor)
        .await
        .expect("assign instructor");
    ClassRoleModel::assign(db, student.id, class.id, Role::Student)
        .await
        .expect("assign student");

    let session = SessionModel::create(db, class.id, "Week 1 lecture", true, None, None, None)
        .await
        .expect("create session");

    TestCtx {
        class,
        instructor,
        student,
        session,
    }
}
