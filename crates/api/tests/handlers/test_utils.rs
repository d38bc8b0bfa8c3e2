use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use serde_json::json;
use slotsync_api::{ApiState, app};
use slotsync_core::{
    coordinator::CoordinatorConfig,
    models::{booking::Booking, mentor::Mentor, slot::Slot},
    store::{DurableStore, MemoryStore},
};

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub server: TestServer,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let server = server_over(store.clone(), config);
        Self { store, server }
    }

    pub async fn mentor(&self) -> Mentor {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();

        let response = self
            .server
            .post("/api/mentors")
            .json(&json!({
                "name": name,
                "email": email,
                "skills": ["rust", "postgres"],
                "experience_years": 6,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Mentor>()
    }

    /// Publishes a one-hour slot starting `hours_ahead` hours from now.
    pub async fn slot(&self, mentor: &Mentor, hours_ahead: i64) -> Slot {
        let start = session_start(hours_ahead);

        let response = self
            .server
            .post("/api/timeslots")
            .json(&json!({
                "mentor_id": mentor.id,
                "start_time": start,
                "end_time": start + Duration::hours(1),
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Slot>()
    }

    pub async fn book(&self, student_id: &str, slot: &Slot) -> Booking {
        let response = self
            .server
            .post("/api/bookings")
            .json(&json!({ "student_id": student_id, "slot_id": slot.id }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Booking>()
    }
}

pub fn server_over(store: Arc<dyn DurableStore>, config: CoordinatorConfig) -> TestServer {
    let state = Arc::new(ApiState::new(store, config));
    TestServer::new(app(state)).expect("Failed to start test server")
}

pub fn session_start(hours_ahead: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(1) + Duration::hours(hours_ahead)
}
