/**
 * Confab Server Binary
 *
 * 1. Load `.env` and initialize tracing from `RUST_LOG` (default `info`)
 * 2. Load `ServerConfig` from `CONFIG_PATH` and the environment
 * 3. Build the router and serve it on `0.0.0.0:<port>`
 */

use confab::backend::server::init::create_app;
use confab::shared::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::load()?;
    let app = create_app(&config).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
