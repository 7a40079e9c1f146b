//! Shared helpers for integration tests: in-memory database setup and
//! seed data for tenants, users and students.

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use schola::migrations::Migrator;
use schola::models::user::Role;
use schola::models::{academic_session, school, school_class, section, student, user};
use schola::services::security::{create_access_token, hash_password};
use schola::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

pub async fn create_test_state() -> AppState {
    AppState::new(create_test_db().await)
}

pub async fn seed_school(db: &DatabaseConnection, name: &str, code: &str) -> school::Model {
    let now = Utc::now();
    school::ActiveModel {
        name: Set(name.to_string()),
        code: Set(code.to_string()),
        address: Set(None),
        phone: Set(None),
        current_session_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_user(
    db: &DatabaseConnection,
    school_id: Option<i64>,
    username: &str,
    role: Role,
) -> user::Model {
    let now = Utc::now();
    user::ActiveModel {
        school_id: Set(school_id),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        full_name: Set(username.to_string()),
        hashed_password: Set(hash_password("test-password").unwrap()),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_session(
    db: &DatabaseConnection,
    school_id: i64,
    name: &str,
    active: bool,
) -> academic_session::Model {
    academic_session::ActiveModel {
        school_id: Set(school_id),
        name: Set(name.to_string()),
        start_date: Set(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()),
        end_date: Set(NaiveDate::from_ymd_opt(2027, 3, 31).unwrap()),
        is_active: Set(active),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_class(
    db: &DatabaseConnection,
    school_id: i64,
    name: &str,
) -> school_class::Model {
    school_class::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(None),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_section(
    db: &DatabaseConnection,
    school_id: i64,
    class_id: i64,
    name: &str,
) -> section::Model {
    section::ActiveModel {
        school_id: Set(school_id),
        class_id: Set(class_id),
        name: Set(name.to_string()),
        class_teacher_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_student(
    db: &DatabaseConnection,
    school_id: i64,
    admission_number: &str,
) -> student::Model {
    let now = Utc::now();
    student::ActiveModel {
        school_id: Set(school_id),
        admission_number: Set(admission_number.to_string()),
        first_name: Set("Student".to_string()),
        last_name: Set(Some(admission_number.to_string())),
        date_of_birth: Set(None),
        guardian_name: Set(None),
        current_session_id: Set(None),
        current_class_id: Set(None),
        current_section_id: Set(None),
        parent_user_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Bearer token for a seeded user.
pub fn token_for(user: &user::Model) -> String {
    create_access_token(user).unwrap()
}
