//! # Tally POS Server
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Logging         tracing-subscriber, RUST_LOG aware                 │
//! │  2. Configuration   defaults → tally.toml → TALLY_* env                │
//! │  3. Database        SQLite (WAL), embedded migrations                  │
//! │  4. Seed            six sample products if the catalog is empty        │
//! │  5. Printer         network or spool driver                            │
//! │  6. Serve           axum until Ctrl+C / SIGTERM                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing::info;

use tally_server::config::ServerConfig;
use tally_server::state::AppState;
use tally_server::{build_router, init_tracing, shutdown_signal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Tally POS server");

    let config = ServerConfig::load(None)?;
    let bind_addr = config.bind_addr()?;
    info!(
        %bind_addr,
        printer = %config.printer.address,
        printer_mode = %config.printer.mode,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config).await?;
    info!("Database connected and migrations applied");

    tally_db::seed::ensure_sample_catalog(&state.db).await?;

    let db = state.db.clone();
    let static_dir = config.static_dir();
    let app = build_router(state, Some(static_dir.as_path()));

    let listener = TcpListener::bind(bind_addr).await?;
    info!(addr = %bind_addr, static_dir = ?static_dir, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}
