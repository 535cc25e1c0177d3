//! # tally-server
//!
//! HTTP API and UI host for Tally POS.
//!
//! ## Module Organization
//! ```text
//! tally_server/
//! ├── lib.rs          ◄─── You are here (router, tracing, shutdown)
//! ├── main.rs         ◄─── Startup sequence
//! ├── config.rs       ◄─── Defaults → tally.toml → TALLY_* env
//! ├── state.rs        ◄─── AppState: Database + ReceiptPrinter
//! ├── error.rs        ◄─── ApiError → JSON failure payloads
//! └── routes/
//!     ├── products.rs ◄─── Catalog
//!     ├── sales.rs    ◄─── Commit, history, detail, reprint
//!     ├── printer.rs  ◄─── Print receipt, open drawer
//!     └── health.rs   ◄─── Liveness
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::routes::{health, printer, products, sales};
use crate::state::AppState;

/// Builds the application router.
///
/// Paths outside the API fall through to `static_dir` when one is given.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/api/sales/{id}", get(sales::get_sale))
        .route("/api/sales/{id}/print", post(sales::reprint_sale))
        .route("/api/print", post(printer::print_receipt))
        .route("/api/drawer", post(printer::open_drawer))
        .route("/health", get(health::health));

    let router = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: `info,tally=debug,sqlx=warn,tower_http=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
