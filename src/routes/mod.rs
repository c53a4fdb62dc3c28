//! Local Relay Server Routes
//!
//! Serves the Lambda handler over plain HTTP for local runs:
//! - `/health` - Health check
//! - everything else - converted to a gateway event and dispatched

pub mod files;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the relay router
pub fn create_router(state: AppState) -> Router {
    info!("Creating relay router");

    Router::new()
        .merge(health::router())
        .merge(files::router(state))
        .layer(TraceLayer::new_for_http())
}
