// File Relay - serverless upload/download relay between API Gateway and S3

pub mod config;
pub mod files;
pub mod handler;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use files::FileService;
pub use handler::dispatch;
pub use models::{AppState, GatewayRequest, GatewayResponse};

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
