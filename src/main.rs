use std::sync::Arc;

use ironroad::api::create_routes;
use ironroad::config::{run_migrations, AppConfig, DatabaseConfig};
use ironroad::services::GeminiClient;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    info!("database migrations applied");

    let model = GeminiClient::from_env(config.gemini_model.clone())?;
    let app = create_routes(pool, &config.jwt_secret, Arc::new(model));

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("ironroad server starting on http://{address}");
    info!("health check available at http://{address}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
