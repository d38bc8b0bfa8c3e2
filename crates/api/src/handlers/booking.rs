use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use slotsync_core::{
    errors::SyncError,
    models::booking::{Booking, BookingListQuery, CancelBookingRequest, CreateBookingRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .coordinator
        .reserve(&payload.student_id, payload.slot_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<BookingListQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;

    let student_id = query
        .student_id
        .ok_or_else(|| SyncError::Invalid("Student ID is required".to_string()))?;

    let bookings = state
        .coordinator
        .bookings_for_student(&student_id, query.status)
        .await?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .coordinator
        .get_booking(id)
        .await?
        .ok_or(SyncError::BookingNotFound(id))?;

    Ok(Json(booking))
}

/// Cancels a booking on behalf of the student named in the body.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<StatusCode, AppError> {
    let student_id = payload
        .and_then(|Json(request)| request.student_id)
        .filter(|student_id| !student_id.trim().is_empty())
        .ok_or_else(|| SyncError::Invalid("Student ID is required".to_string()))?;

    state.coordinator.release(id, Some(&student_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
