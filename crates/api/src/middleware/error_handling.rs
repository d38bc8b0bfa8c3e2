//! # Error Handling Middleware
//!
//! Maps [`SyncError`]s to HTTP status codes and JSON error bodies so that
//! every endpoint fails the same way. The status is chosen from the error's
//! [`ErrorKind`], never from its message:
//!
//! | kind | status |
//! |---|---|
//! | `not_found` | 404 |
//! | `conflict` | 409 |
//! | `unauthorized` | 403 |
//! | `invalid` | 400 |
//! | `unavailable` | 503 |

use axum::{
    BoxError, Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotsync_core::errors::{ErrorKind, SyncError};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotsync_api::middleware::error_handling::AppError;
/// use slotsync_core::errors::SyncError;
/// use uuid::Uuid;
///
/// async fn handler(id: Uuid) -> Result<Json<Uuid>, AppError> {
///     Err(AppError(SyncError::BookingNotFound(id)))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub SyncError);

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::Invalid => StatusCode::BAD_REQUEST,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);

        if kind == ErrorKind::Unavailable {
            error!(error = ?self.0, "request failed on the store");
        }

        let body = Json(json!({ "error": self.0.to_string(), "kind": kind }));
        (status, body).into_response()
    }
}

/// Automatic conversion from SyncError to AppError
impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Unclassified failures are treated as store outages.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SyncError::Unavailable(err))
    }
}

/// Malformed query strings are validation failures.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SyncError::Invalid(rejection.body_text()))
    }
}

/// Maps a SyncError to an HTTP response
pub fn map_error(err: SyncError) -> Response {
    AppError(err).into_response()
}

/// Renders failures raised by the tower middleware stack, chiefly the
/// request timeout.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return map_error(SyncError::Unavailable(eyre::eyre!("request timed out")));
    }

    error!(error = %err, "unhandled middleware error");
    let body = Json(json!({ "error": err.to_string(), "kind": ErrorKind::Unavailable }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
