use std::net::SocketAddr;

use tracing::{info, Level};

use user_manager_backend::{create_router, initialize_backend};

// Bind address used when USER_MANAGER_ADDR is not set
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let state = initialize_backend().await?;
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("USER_MANAGER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
