use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::roles::{FeesCollect, FeesManage, Guarded};
use crate::models::audit_log::{AuditAction, ResourceType};
use crate::models::prelude::*;
use crate::models::{academic_session, fee_structure, school_class, student_fee};
use crate::services::audit::RequestMeta;
use crate::services::fees::{self, CollectionReceipt, FeeSummaryRow};
use crate::state::AppState;

/// Create fee routes
pub fn fees_routes(state: AppState) -> Router {
    Router::new()
        .route("/structures", get(list_structures).post(create_structure))
        .route("/assign", post(assign_fee))
        .route("/collect", post(collect_payment))
        .route("/students/{student_id}", get(student_summary))
        .with_state(state)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStructureRequest {
    pub session_id: i64,
    pub class_id: i64,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct AssignFeeRequest {
    pub student_id: i64,
    pub fee_structure_id: i64,
    #[serde(default)]
    pub concession_amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct CollectRequest {
    pub student_fee_id: i64,
    pub amount: f64,
    pub note: Option<String>,
}

async fn list_structures(
    guard: Guarded<FeesManage>,
    State(state): State<AppState>,
) -> Result<Json<Vec<fee_structure::Model>>> {
    let school_id = guard.school_id()?;
    let structures = FeeStructure::find()
        .filter(fee_structure::Column::SchoolId.eq(school_id))
        .order_by_asc(fee_structure::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(structures))
}

async fn create_structure(
    guard: Guarded<FeesManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CreateStructureRequest>,
) -> Result<Json<fee_structure::Model>> {
    request.validate()?;
    let school_id = guard.school_id()?;

    AcademicSession::find_by_id(request.session_id)
        .filter(academic_session::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("session_id"))?;
    SchoolClass::find_by_id(request.class_id)
        .filter(school_class::Column::SchoolId.eq(school_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_a_valid_choice("class_id"))?;

    let structure = fee_structure::ActiveModel {
        school_id: Set(school_id),
        session_id: Set(request.session_id),
        class_id: Set(request.class_id),
        name: Set(request.name),
        amount: Set(request.amount),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .audit
        .record(
            AuditAction::FeeStructureCreated,
            ResourceType::FeeStructure,
            Some(structure.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({ "name": structure.name, "amount": structure.amount })),
            meta,
        )
        .await;

    Ok(Json(structure))
}

async fn assign_fee(
    guard: Guarded<FeesManage>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<AssignFeeRequest>,
) -> Result<Json<student_fee::Model>> {
    let school_id = guard.school_id()?;
    let fee = fees::assign(
        &state.db,
        school_id,
        request.student_id,
        request.fee_structure_id,
        request.concession_amount,
    )
    .await?;

    state
        .audit
        .record(
            AuditAction::FeeAssigned,
            ResourceType::StudentFee,
            Some(fee.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({
                "student_id": fee.student_id,
                "total_amount": fee.total_amount,
            })),
            meta,
        )
        .await;

    Ok(Json(fee))
}

async fn collect_payment(
    guard: Guarded<FeesCollect>,
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CollectRequest>,
) -> Result<Json<CollectionReceipt>> {
    let school_id = guard.school_id()?;
    let receipt = fees::collect(
        &state.db,
        school_id,
        Some(guard.user().id),
        request.student_fee_id,
        request.amount,
        request.note,
    )
    .await?;

    state
        .audit
        .record(
            AuditAction::FeeCollected,
            ResourceType::FeePayment,
            Some(receipt.payment.id.to_string()),
            Some(guard.user()),
            Some(serde_json::json!({
                "receipt_number": receipt.payment.receipt_number,
                "amount": receipt.payment.amount,
            })),
            meta,
        )
        .await;

    Ok(Json(receipt))
}

async fn student_summary(
    guard: Guarded<FeesManage>,
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<FeeSummaryRow>>> {
    let school_id = guard.school_id()?;
    let summary = fees::summary_for_student(&state.db, school_id, student_id).await?;
    Ok(Json(summary))
}
