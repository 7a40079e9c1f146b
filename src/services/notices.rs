//! Notice visibility and read tracking.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::notice::Audience;
use crate::models::prelude::*;
use crate::models::user::Role;

/// Published notices visible to a user: audience `all` plus the user's own
/// role, newest first.
pub async fn visible_notices(
    db: &DbConn,
    school_id: i64,
    role: Role,
) -> Result<Vec<notice::Model>> {
    // Schooladmins author notices and see every audience's feed through
    // their own lens. Superadmins are schoolless and never reach here with
    // a school_id, but the match stays total.
    let audience = match role {
        Role::Superadmin | Role::Schooladmin => Audience::Schooladmin,
        Role::Teacher => Audience::Teacher,
        Role::Accountant => Audience::Accountant,
        Role::Staff => Audience::Staff,
        Role::Parent => Audience::Parent,
    };

    let notices = Notice::find()
        .filter(notice::Column::SchoolId.eq(school_id))
        .filter(notice::Column::IsPublished.eq(true))
        .filter(
            Condition::any()
                .add(notice::Column::TargetRole.eq(Audience::All))
                .add(notice::Column::TargetRole.eq(audience)),
        )
        .order_by_desc(notice::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(notices)
}

/// Record that a user read a notice. Returns `true` only on the first
/// read; later calls find the existing marker and change nothing.
pub async fn mark_read(
    db: &DbConn,
    school_id: i64,
    user: &user::Model,
    notice_id: i64,
) -> Result<bool> {
    let notice = Notice::find_by_id(notice_id)
        .filter(notice::Column::SchoolId.eq(school_id))
        .filter(notice::Column::IsPublished.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notice not found".to_string()))?;

    // Schooladmins may acknowledge any published notice of their school,
    // including ones targeted at other roles they authored.
    if !notice.target_role.includes(user.role) && user.role != Role::Schooladmin {
        return Err(AppError::NotFound("Notice not found".to_string()));
    }

    let existing = NoticeRead::find()
        .filter(notice_read::Column::NoticeId.eq(notice.id))
        .filter(notice_read::Column::UserId.eq(user.id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    let row = notice_read::ActiveModel {
        notice_id: Set(notice.id),
        user_id: Set(user.id),
        read_at: Set(Utc::now()),
        ..Default::default()
    };
    // A concurrent first read may have landed between the lookup and the
    // insert; the unique index makes that harmless.
    NoticeRead::insert(row)
        .on_conflict(
            OnConflict::columns([
                notice_read::Column::NoticeId,
                notice_read::Column::UserId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(true)
}

/// Flip a notice between draft and published.
pub async fn toggle_publish(
    db: &DbConn,
    school_id: i64,
    notice_id: i64,
) -> Result<notice::Model> {
    use sea_orm::ActiveModelTrait;

    let notice = Notice::find_by_id(notice_id)
        .filter(notice::Column::SchoolId.eq(school_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notice not found".to_string()))?;

    let next = !notice.is_published;
    let mut model: notice::ActiveModel = notice.into();
    model.is_published = Set(next);
    model.updated_at = Set(Utc::now());
    Ok(model.update(db).await?)
}
