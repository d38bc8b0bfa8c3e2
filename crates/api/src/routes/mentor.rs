use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/mentors",
            post(handlers::mentor::create_mentor).get(handlers::mentor::list_mentors),
        )
        .route("/api/mentors/:id", get(handlers::mentor::get_mentor))
        .route("/api/mentors/:id/slots", get(handlers::mentor::mentor_slots))
        .route(
            "/api/mentors/:id/bookings",
            get(handlers::mentor::mentor_bookings),
        )
}
