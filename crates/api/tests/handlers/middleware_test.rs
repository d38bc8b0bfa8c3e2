use std::sync::Arc;

use axum::{
    body::to_bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use slotsync_api::middleware::error_handling::{AppError, handle_middleware_error, map_error};
use slotsync_core::{
    coordinator::CoordinatorConfig,
    errors::SyncError,
    store::StoreError,
};
use slotsync_db::mock::MockStore;
use tower::timeout::error::Elapsed;
use uuid::Uuid;

use crate::test_utils::server_over;

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

#[rstest]
#[case(SyncError::SlotNotFound(Uuid::new_v4()), StatusCode::NOT_FOUND)]
#[case(SyncError::BookingNotFound(Uuid::new_v4()), StatusCode::NOT_FOUND)]
#[case(SyncError::SlotAlreadyClaimed(Uuid::new_v4()), StatusCode::CONFLICT)]
#[case(SyncError::AlreadyCancelled(Uuid::new_v4()), StatusCode::CONFLICT)]
#[case(SyncError::Unauthorized("Not your time slot".into()), StatusCode::FORBIDDEN)]
#[case(SyncError::Invalid("Student ID is required".into()), StatusCode::BAD_REQUEST)]
#[case(SyncError::Unavailable(eyre::eyre!("pool timed out")), StatusCode::SERVICE_UNAVAILABLE)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: SyncError, #[case] status: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), status);
}

#[tokio::test]
async fn test_error_body_shape() {
    let slot_id = Uuid::nil();
    let response = AppError(SyncError::SlotAlreadyClaimed(slot_id)).into_response();

    let body = body_json(response).await;

    assert_eq!(
        body,
        json!({
            "error": format!("Slot already claimed: {}", slot_id),
            "kind": "conflict",
        })
    );
}

#[tokio::test]
async fn test_eyre_report_is_unavailable() {
    let response = map_error(AppError::from(eyre::eyre!("connection refused")).0);

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "unavailable");
}

#[tokio::test]
async fn test_request_timeout_is_unavailable() {
    let response = handle_middleware_error(Box::new(Elapsed::new())).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "unavailable");
    assert!(body["error"].as_str().unwrap().contains("request timed out"));
}

#[test_log::test(tokio::test)]
async fn test_store_outage_surfaces_as_503() {
    let mut store = MockStore::new();
    store
        .expect_get_slot()
        .returning(|_| Err(StoreError::Unavailable(eyre::eyre!("connection reset by peer"))));
    store.expect_transact().never();

    let server = server_over(Arc::new(store), CoordinatorConfig::default());
    let response = server
        .post("/api/bookings")
        .json(&json!({ "student_id": "S001", "slot_id": Uuid::new_v4() }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["kind"], "unavailable");
}

#[tokio::test]
async fn test_health_and_version() {
    let server = server_over(Arc::new(MockStore::new()), CoordinatorConfig::default());

    let body: Value = server.get("/health").await.json();
    assert_eq!(body, json!({ "status": "ok" }));

    let body: Value = server.get("/version").await.json();
    assert_eq!(body["name"], "slotsync-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
