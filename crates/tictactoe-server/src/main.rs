//! Single-player tic-tac-toe server over WebSocket.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod protocol;
mod server;
mod table;

use config::ServerConfig;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    info!(
        addr = %config.addr,
        bot_delay_ms = config.bot_delay.as_millis() as u64,
        difficulty = %config.default_difficulty,
        "Starting tic-tac-toe server..."
    );

    let addr = config.addr;
    let state = Arc::new(ServerState::new(config));

    server::run_server(addr, state).await
}
