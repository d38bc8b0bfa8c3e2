use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slotsync_core::{
    coordinator::CoordinatorConfig,
    models::{
        booking::{Booking, BookingStatus},
        slot::Slot,
    },
};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_reserve_returns_confirmed_booking() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;

    let booking = ctx.book("S001", &slot).await;

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.slot_id, slot.id);
    assert_eq!(booking.mentor_id, mentor.id);
    assert_eq!(booking.session_start, slot.start_time);
    assert_eq!(booking.cancelled_at, None);

    let slot: Slot = ctx.server.get(&format!("/api/timeslots/{}", slot.id)).await.json();
    assert!(slot.is_booked);
}

#[tokio::test]
async fn test_second_reservation_conflicts() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;
    ctx.book("S001", &slot).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({ "student_id": "S002", "slot_id": slot.id }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn test_conflict_without_precheck() {
    let ctx = TestContext::with_config(CoordinatorConfig {
        precheck: false,
        ..CoordinatorConfig::default()
    });
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;
    ctx.book("S001", &slot).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({ "student_id": "S002", "slot_id": slot.id }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reserve_rejections() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({ "student_id": "S001", "slot_id": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({ "student_id": "   ", "slot_id": slot.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid");
}

#[tokio::test]
async fn test_get_and_list_bookings() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let late = ctx.slot(&mentor, 5).await;
    let early = ctx.slot(&mentor, 1).await;
    let other = ctx.slot(&mentor, 3).await;

    let second = ctx.book("S001", &late).await;
    let first = ctx.book("S001", &early).await;
    ctx.book("S002", &other).await;

    let fetched: Booking = ctx
        .server
        .get(&format!("/api/bookings/{}", first.id))
        .await
        .json();
    assert_eq!(fetched, first);

    let response = ctx.server.get("/api/bookings").add_query_param("student_id", "S001").await;
    response.assert_status_ok();
    let listed: Vec<Booking> = response.json();
    assert_eq!(
        listed.iter().map(|booking| booking.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let response = ctx
        .server
        .get(&format!("/api/bookings/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = ctx.server.get("/api/bookings").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_rules() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;
    let booking = ctx.book("S001", &slot).await;
    let path = format!("/api/bookings/{}", booking.id);

    // missing body
    ctx.server
        .delete(&path)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .delete(&path)
        .json(&json!({ "student_id": "S002" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "unauthorized");

    ctx.server
        .delete(&path)
        .json(&json!({ "student_id": "S001" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .delete(&path)
        .json(&json!({ "student_id": "S001" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let cancelled: Booking = ctx.server.get(&path).await.json();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let response = ctx
        .server
        .get("/api/bookings")
        .add_query_param("student_id", "S001")
        .add_query_param("status", "cancelled")
        .await;
    let listed: Vec<Booking> = response.json();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_released_slot_can_be_rebooked() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;
    let booking = ctx.book("S001", &slot).await;

    ctx.server
        .delete(&format!("/api/bookings/{}", booking.id))
        .json(&json!({ "student_id": "S001" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let rebooked = ctx.book("S002", &slot).await;
    assert_ne!(rebooked.id, booking.id);

    let response = ctx
        .server
        .delete(&format!("/api/bookings/{}", Uuid::new_v4()))
        .json(&json!({ "student_id": "S001" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_status_filter_is_invalid() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;

    let response = ctx
        .server
        .get("/api/bookings")
        .add_query_param("student_id", "S001")
        .add_query_param("status", "pending")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid");

    let response = ctx
        .server
        .get(&format!("/api/mentors/{}/bookings", mentor.id))
        .add_query_param("status", "pending")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid");
}
