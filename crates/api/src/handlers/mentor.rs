use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use slotsync_core::{
    errors::SyncError,
    models::{
        booking::{Booking, MentorBookingsQuery},
        mentor::{CreateMentorRequest, Mentor},
        slot::{Slot, SlotListQuery},
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_mentor(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateMentorRequest>,
) -> Result<(StatusCode, Json<Mentor>), AppError> {
    let mentor = state.directory.create_mentor(payload).await?;

    Ok((StatusCode::CREATED, Json(mentor)))
}

#[axum::debug_handler]
pub async fn list_mentors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Mentor>>, AppError> {
    let mentors = state.directory.list_mentors().await?;

    Ok(Json(mentors))
}

#[axum::debug_handler]
pub async fn get_mentor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Mentor>, AppError> {
    let mentor = state
        .directory
        .get_mentor(id)
        .await?
        .ok_or_else(|| SyncError::NotFound(format!("Mentor with ID {} not found", id)))?;

    Ok(Json(mentor))
}

#[axum::debug_handler]
pub async fn mentor_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    query: Result<Query<SlotListQuery>, QueryRejection>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let Query(query) = query?;

    let slots = state
        .catalog
        .mentor_slots(id, query.available_only.unwrap_or(true))
        .await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn mentor_bookings(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    query: Result<Query<MentorBookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;

    let bookings = state
        .coordinator
        .bookings_for_mentor(id, query.status)
        .await?;

    Ok(Json(bookings))
}
