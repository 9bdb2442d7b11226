use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use nederland_2029::{catalog::PartyCatalog, config::Config, create_router, utils::init_logger, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let _log_guard = init_logger("nederland_2029=debug,tower_http=debug,axum=debug", "server.log");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Load the party catalog
    let catalog = match &config.catalog.path {
        Some(path) => PartyCatalog::load(path)?,
        None => PartyCatalog::builtin()?,
    };

    // Create shared state
    let state = AppState {
        catalog: Arc::new(catalog),
        config: config.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
