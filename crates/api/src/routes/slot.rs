use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/timeslots", post(handlers::slot::create_slot))
        .route(
            "/api/timeslots/:id",
            get(handlers::slot::get_slot)
                .put(handlers::slot::reschedule_slot)
                .delete(handlers::slot::withdraw_slot),
        )
}
