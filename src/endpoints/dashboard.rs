use axum::{extract::State, routing::get, Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::roles::Authenticated;
use crate::models::prelude::*;
use crate::models::user::Role;
use crate::models::{
    academic_session, homework, notice_read, section, student, student_fee, user,
};
use crate::services::notices;
use crate::state::AppState;

/// Create dashboard routes
pub fn dashboard_routes(state: AppState) -> Router {
    Router::new().route("/", get(dashboard)).with_state(state)
}

/// Role-scoped counters for the landing view. The shape varies by role;
/// absent counters serialize as null.
#[derive(Debug, Default, Serialize)]
pub struct DashboardResponse {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schools: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teachers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_sections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homework_assigned: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees_outstanding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_notices: Option<u64>,
}

async fn dashboard(
    auth: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    let user = auth.user().clone();
    let mut response = DashboardResponse {
        role: user.role.to_string(),
        ..Default::default()
    };

    if user.role == Role::Superadmin {
        response.schools = Some(School::find().count(&state.db).await?);
        return Ok(Json(response));
    }

    let school_id = auth.school_id()?;

    let active_session = AcademicSession::find()
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .filter(academic_session::Column::IsActive.eq(true))
        .one(&state.db)
        .await?;
    response.active_session = active_session.map(|s| s.name);

    match user.role {
        Role::Schooladmin => {
            response.students = Some(
                Student::find()
                    .filter(student::Column::SchoolId.eq(school_id))
                    .filter(student::Column::IsActive.eq(true))
                    .count(&state.db)
                    .await?,
            );
            response.teachers = Some(
                User::find()
                    .filter(user::Column::SchoolId.eq(school_id))
                    .filter(user::Column::Role.eq(Role::Teacher))
                    .count(&state.db)
                    .await?,
            );
        }
        Role::Teacher => {
            response.my_sections = Some(
                Section::find()
                    .filter(section::Column::SchoolId.eq(school_id))
                    .filter(section::Column::ClassTeacherId.eq(user.id))
                    .count(&state.db)
                    .await?,
            );
            response.homework_assigned = Some(
                Homework::find()
                    .filter(homework::Column::SchoolId.eq(school_id))
                    .filter(homework::Column::CreatedBy.eq(user.id))
                    .count(&state.db)
                    .await?,
            );
        }
        Role::Accountant => {
            let fees = StudentFee::find()
                .filter(student_fee::Column::SchoolId.eq(school_id))
                .all(&state.db)
                .await?;
            response.fees_outstanding =
                Some(fees.iter().map(|f| f.due_amount()).sum());
        }
        Role::Parent => {
            response.children = Some(
                Student::find()
                    .filter(student::Column::SchoolId.eq(school_id))
                    .filter(student::Column::ParentUserId.eq(user.id))
                    .count(&state.db)
                    .await?,
            );
        }
        _ => {}
    }

    // Unread published notices, common to every school-bound role.
    let visible = notices::visible_notices(&state.db, school_id, user.role).await?;
    let mut unread = 0u64;
    for n in &visible {
        let read = NoticeRead::find()
            .filter(notice_read::Column::NoticeId.eq(n.id))
            .filter(notice_read::Column::UserId.eq(user.id))
            .count(&state.db)
            .await?;
        if read == 0 {
            unread += 1;
        }
    }
    response.unread_notices = Some(unread);

    Ok(Json(response))
}
