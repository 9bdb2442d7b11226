// Nederland 2029 - party catalog API and program summary generator

pub mod config;
pub mod catalog;
pub mod models;
pub mod types;
pub mod llm;
pub mod summaries;  // Offline PDF -> AI summary pipeline
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
