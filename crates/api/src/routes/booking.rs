use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/bookings",
            post(handlers::booking::create_booking).get(handlers::booking::list_bookings),
        )
        .route(
            "/api/bookings/:id",
            get(handlers::booking::get_booking).delete(handlers::booking::cancel_booking),
        )
}
