use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use travel_planner_agent::{api::start_server, config::AppConfig, tools::create_default_registry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    if config.search_api_key.is_empty() {
        eprintln!("⚠️  API_KEY not set in .env");
        eprintln!("📌 Flight, hotel and quote lookups will fail until it is configured");
    }

    info!("🚀 Travel Planner Agent - API Server");
    info!("📍 Port: {}", config.port);
    info!(?config, "Configuration loaded");

    let registry = Arc::new(create_default_registry(&config)?);

    info!(tools = ?registry.list(), "✅ Tools registered");
    info!("📡 Starting API server...");

    start_server(registry, config.port).await?;

    Ok(())
}
