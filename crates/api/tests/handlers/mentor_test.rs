use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use slotsync_core::models::{
    booking::Booking,
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_and_fetch_mentor() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;

    assert_eq!(mentor.status, MentorStatus::Active);
    assert_eq!(mentor.skills, vec!["rust".to_string(), "postgres".to_string()]);

    let fetched: Mentor = ctx
        .server
        .get(&format!("/api/mentors/{}", mentor.id))
        .await
        .json();
    assert_eq!(fetched, mentor);

    let listed: Vec<Mentor> = ctx.server.get("/api/mentors").await.json();
    assert_eq!(listed, vec![mentor]);

    let response = ctx
        .server
        .get(&format!("/api/mentors/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "not_found");
}

#[rstest]
#[case(json!({ "name": "", "email": "ada@example.com" }))]
#[case(json!({ "name": "Ada", "email": "" }))]
#[case(json!({ "name": "Ada", "email": "ada@example.com", "experience_years": -2 }))]
#[tokio::test]
async fn test_invalid_mentor(#[case] payload: Value) {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/mentors").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mentor_slots_and_bookings() {
    let ctx = TestContext::new();
    let mentor = ctx.mentor().await;
    let taken = ctx.slot(&mentor, 0).await;
    let open = ctx.slot(&mentor, 2).await;
    let booking = ctx.book("S001", &taken).await;

    let all: Vec<Slot> = ctx
        .server
        .get(&format!("/api/mentors/{}/slots", mentor.id))
        .add_query_param("available_only", false)
        .await
        .json();
    assert_eq!(
        all.iter().map(|slot| slot.id).collect::<Vec<_>>(),
        vec![taken.id, open.id]
    );

    let available: Vec<Slot> = ctx
        .server
        .get(&format!("/api/mentors/{}/slots", mentor.id))
        .add_query_param("available_only", true)
        .await
        .json();
    assert_eq!(available.iter().map(|slot| slot.id).collect::<Vec<_>>(), vec![open.id]);

    // claimed slots are hidden unless asked for
    let default: Vec<Slot> = ctx
        .server
        .get(&format!("/api/mentors/{}/slots", mentor.id))
        .await
        .json();
    assert_eq!(default, available);

    let bookings: Vec<Booking> = ctx
        .server
        .get(&format!("/api/mentors/{}/bookings", mentor.id))
        .await
        .json();
    assert_eq!(bookings, vec![booking]);

    let cancelled: Vec<Booking> = ctx
        .server
        .get(&format!("/api/mentors/{}/bookings", mentor.id))
        .add_query_param("status", "cancelled")
        .await
        .json();
    assert!(cancelled.is_empty());
}
