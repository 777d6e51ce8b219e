//! Shared seed data for engine tests.

use db::models::{
    class,
    class_role::{self, Role},
    class_session, user,
};
use sea_orm::DatabaseConnection;

pub struct SeededClass {
    pub class: class::Model,
    pub instructor: user::Model,
    pub student: user::Model,
    pub session: class_session::Model,
}

/// One class with an instructor, one enrolled student, and an
/// attendance-enabled session with no schedule configured.
pub async fn seed_class(db: &DatabaseConnection) -> SeededClass {
    let class = class::Model::create(db, "RUST101", "Intro to Rust", None)
        .await
        .expect("create class");
    let instructor = user::Model::create(db, "inst", "inst@test.dev", "password", false)
        .await
        .expect("create instructor");
    let student = user::Model::create(db, "stud", "stud@test.dev", "password", false)
        .await
        .expect("create student");

    class_role::Model::assign(db, instructor.id, class.id, Role::Instructor)
        .await
        .expect("assign instructor");
    class_role::Model::assign(db, student.id, class.id, Role::Student)
        .await
        .expect("assign student");

    let session = class_session::Model::create(db, class.id, "Week 1 lecture", true, None, None, None)
        .await
        .expect("create session");

    SeededClass {
        class,
        instructor,
        student,
        session,
    }
}
