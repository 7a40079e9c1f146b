//! Academic session lifecycle.
//!
//! Sessions are created inactive; `activate` is the only transition and is
//! atomic: deactivate every other session of the school, activate the
//! target, repoint `schools.current_session_id` — all in one transaction.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::db::DbConn;
use crate::error::{AppError, Result};
use crate::models::prelude::*;

/// Activate a session for a school, deactivating all its siblings.
pub async fn activate(
    db: &DbConn,
    school_id: i64,
    session_id: i64,
) -> Result<academic_session::Model> {
    let session = db
        .transaction::<_, academic_session::Model, AppError>(move |txn| {
            Box::pin(async move {
                let session = AcademicSession::find_by_id(session_id)
                    .filter(academic_session::Column::SchoolId.eq(school_id))
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

                AcademicSession::update_many()
                    .col_expr(academic_session::Column::IsActive, Expr::value(false))
                    .filter(academic_session::Column::SchoolId.eq(school_id))
                    .exec(txn)
                    .await?;

                let mut model: academic_session::ActiveModel = session.into();
                model.is_active = Set(true);
                let session = model.update(txn).await?;

                School::update_many()
                    .col_expr(
                        school::Column::CurrentSessionId,
                        Expr::value(Some(session.id)),
                    )
                    .filter(school::Column::Id.eq(school_id))
                    .exec(txn)
                    .await?;

                Ok(session)
            })
        })
        .await?;

    Ok(session)
}
