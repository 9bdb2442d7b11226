//! API Routes
//!
//! Read-only endpoints over the party catalog:
//! - `/` - Service banner
//! - `/health` - Health check
//! - `/api/parties` - Full catalog in declaration order
//! - `/api/parties/{id}` - One party by id

pub mod health;
pub mod parties;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(health::router())
        .merge(parties::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    apply_cors(router, &origins)
}
