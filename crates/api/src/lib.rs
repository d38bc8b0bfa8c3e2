//! # SlotSync API
//!
//! The API crate provides the web server for the SlotSync booking service.
//! It exposes RESTful endpoints for mentors, their time slots, and student
//! bookings.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into coordinator, catalog and directory calls
//! - **Middleware**: Error rendering and the tower middleware stack
//! - **Config**: Handle environment and application configuration
//!
//! Handlers never touch the database directly; every read and write goes
//! through a [`DurableStore`] injected at startup.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling for handlers and middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use slotsync_core::{
    catalog::SlotCatalog,
    coordinator::{CoordinatorConfig, ReservationCoordinator},
    directory::MentorDirectory,
    store::DurableStore,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// All three services share one store handle.
pub struct ApiState {
    pub coordinator: ReservationCoordinator,
    pub catalog: SlotCatalog,
    pub directory: MentorDirectory,
}

impl ApiState {
    pub fn new(store: Arc<dyn DurableStore>, config: CoordinatorConfig) -> Self {
        let store_timeout = config.store_timeout;
        Self {
            catalog: SlotCatalog::new(store.clone(), store_timeout),
            directory: MentorDirectory::new(store.clone(), store_timeout),
            coordinator: ReservationCoordinator::new(store, config),
        }
    }
}

/// Builds the application router with all routes and request tracing
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Mentor profile endpoints
        .merge(routes::mentor::routes())
        // Slot publishing endpoints
        .merge(routes::slot::routes())
        // Reservation endpoints
        .merge(routes::booking::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Starts the API server over the given store
///
/// Sets up logging, CORS and the request timeout, then serves until the
/// listener fails.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slotsync_api::{config::ApiConfig, start_server};
/// use slotsync_core::store::MemoryStore;
///
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// start_server(config, Arc::new(MemoryStore::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn DurableStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState::new(store, config.coordinator_config()));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS entry")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(
                middleware::error_handling::handle_middleware_error,
            ))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        backend = ?config.store_backend,
        precheck = config.reservation_precheck,
        "Server listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
