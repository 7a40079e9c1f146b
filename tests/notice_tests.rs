//! Notice visibility and read-tracking tests.

mod common;

use chrono::Utc;
use common::{create_test_db, seed_school, seed_user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use schola::models::notice::{self, Audience};
use schola::models::prelude::*;
use schola::models::user::Role;
use schola::services::notices;

async fn seed_notice(
    db: &sea_orm::DatabaseConnection,
    school_id: i64,
    title: &str,
    audience: Audience,
    published: bool,
) -> notice::Model {
    let now = Utc::now();
    notice::ActiveModel {
        school_id: Set(school_id),
        title: Set(title.to_string()),
        body: Set("body".to_string()),
        target_role: Set(audience),
        is_published: Set(published),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn visibility_respects_publish_flag_role_and_school() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let other = seed_school(&db, "Beta", "BT").await;

    seed_notice(&db, school.id, "for-everyone", Audience::All, true).await;
    seed_notice(&db, school.id, "for-teachers", Audience::Teacher, true).await;
    seed_notice(&db, school.id, "for-parents", Audience::Parent, true).await;
    seed_notice(&db, school.id, "draft", Audience::All, false).await;
    seed_notice(&db, other.id, "other-school", Audience::All, true).await;

    let visible = notices::visible_notices(&db, school.id, Role::Teacher)
        .await
        .unwrap();
    let titles: Vec<&str> = visible.iter().map(|n| n.title.as_str()).collect();
    assert!(titles.contains(&"for-everyone"));
    assert!(titles.contains(&"for-teachers"));
    assert!(!titles.contains(&"for-parents"));
    assert!(!titles.contains(&"draft"));
    assert!(!titles.contains(&"other-school"));
}

#[tokio::test]
async fn mark_read_is_idempotent_and_reports_first_read() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let teacher = seed_user(&db, Some(school.id), "teacher1", Role::Teacher).await;
    let n = seed_notice(&db, school.id, "exam-schedule", Audience::Teacher, true).await;

    let first = notices::mark_read(&db, school.id, &teacher, n.id).await.unwrap();
    let second = notices::mark_read(&db, school.id, &teacher, n.id).await.unwrap();
    assert!(first);
    assert!(!second);

    let count = NoticeRead::find()
        .filter(schola::models::notice_read::Column::NoticeId.eq(n.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn schooladmin_can_acknowledge_any_audience() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let admin = seed_user(&db, Some(school.id), "admin1", Role::Schooladmin).await;
    let teacher = seed_user(&db, Some(school.id), "teacher1", Role::Teacher).await;
    let n = seed_notice(&db, school.id, "staff-meeting", Audience::Teacher, true).await;

    // The author-side exemption: admins read notices targeted at others.
    assert!(notices::mark_read(&db, school.id, &admin, n.id).await.unwrap());

    // Ordinary readers stay bound to the audience rule.
    let for_parents = seed_notice(&db, school.id, "ptm", Audience::Parent, true).await;
    assert!(notices::mark_read(&db, school.id, &teacher, for_parents.id)
        .await
        .is_err());
}

#[tokio::test]
async fn mark_read_rejects_unpublished_and_foreign_notices() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let other = seed_school(&db, "Beta", "BT").await;
    let teacher = seed_user(&db, Some(school.id), "teacher1", Role::Teacher).await;

    let draft = seed_notice(&db, school.id, "draft", Audience::All, false).await;
    assert!(notices::mark_read(&db, school.id, &teacher, draft.id).await.is_err());

    let foreign = seed_notice(&db, other.id, "foreign", Audience::All, true).await;
    assert!(notices::mark_read(&db, school.id, &teacher, foreign.id).await.is_err());
}

#[tokio::test]
async fn toggle_publish_flips_state() {
    let db = create_test_db().await;
    let school = seed_school(&db, "Hill View", "HV").await;
    let n = seed_notice(&db, school.id, "draft", Audience::All, false).await;

    let published = notices::toggle_publish(&db, school.id, n.id).await.unwrap();
    assert!(published.is_published);
    let unpublished = notices::toggle_publish(&db, school.id, n.id).await.unwrap();
    assert!(!unpublished.is_published);
}
