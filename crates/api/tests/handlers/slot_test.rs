use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use slotsync_core::models::slot::Slot;
use uuid::Uuid;

use crate::test_utils::{TestContext, session_start};

#[tokio::test]
async fn test_create_slot_validation() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let start = session_start(0);

    let response = ctx
        .server
        .post("/api/timeslots")
        .json(&json!({
            "mentor_id": mentor.id,
            "start_time": start,
            "end_time": start - Duration::minutes(15),
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = ctx
        .server
        .post("/api/timeslots")
        .json(&json!({
            "mentor_id": Uuid::new_v4(),
            "start_time": start,
            "end_time": start + Duration::hours(1),
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let slot = ctx.slot(&mentor, 0).await;
    assert!(!slot.is_booked);
    assert_eq!(slot.mentor_id, mentor.id);

    ctx.server
        .get(&format!("/api/timeslots/{}", Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reschedule_slot() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let slot = ctx.slot(&mentor, 0).await;
    let path = format!("/api/timeslots/{}", slot.id);
    let new_end = slot.end_time + Duration::minutes(30);

    let response = ctx
        .server
        .put(&path)
        .json(&json!({ "mentor_id": Uuid::new_v4(), "end_time": new_end }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .put(&path)
        .json(&json!({ "mentor_id": mentor.id, "end_time": new_end }))
        .await;
    response.assert_status_ok();
    let moved: Slot = response.json();
    assert_eq!(moved.start_time, slot.start_time);
    assert_eq!(moved.end_time, new_end);

    ctx.book("S001", &slot).await;
    let response = ctx
        .server
        .put(&path)
        .json(&json!({ "mentor_id": mentor.id, "end_time": new_end + Duration::minutes(30) }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_withdraw_slot() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let booked = ctx.slot(&mentor, 0).await;
    let free = ctx.slot(&mentor, 2).await;
    ctx.book("S001", &booked).await;

    ctx.server
        .delete(&format!("/api/timeslots/{}", booked.id))
        .json(&json!({ "mentor_id": mentor.id }))
        .await
        .assert_status(StatusCode::CONFLICT);

    ctx.server
        .delete(&format!("/api/timeslots/{}", free.id))
        .json(&json!({ "mentor_id": mentor.id }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .get(&format!("/api/timeslots/{}", free.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
