use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use slotsync_core::{
    errors::SyncError,
    models::slot::{CreateSlotRequest, RescheduleSlotRequest, Slot, WithdrawSlotRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<Slot>), AppError> {
    let slot = state
        .catalog
        .create_slot(payload.mentor_id, payload.start_time, payload.end_time)
        .await?;

    Ok((StatusCode::CREATED, Json(slot)))
}

#[axum::debug_handler]
pub async fn get_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Slot>, AppError> {
    let slot = state
        .catalog
        .get_slot(id)
        .await?
        .ok_or(SyncError::SlotNotFound(id))?;

    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn reschedule_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleSlotRequest>,
) -> Result<Json<Slot>, AppError> {
    let slot = state
        .catalog
        .reschedule_slot(id, payload.mentor_id, payload.start_time, payload.end_time)
        .await?;

    Ok(Json(slot))
}

#[axum::debug_handler]
pub async fn withdraw_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WithdrawSlotRequest>,
) -> Result<StatusCode, AppError> {
    state.catalog.withdraw_slot(id, payload.mentor_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
