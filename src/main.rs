// =============================================================================
// Clarity Signal — Main Entry Point
// =============================================================================
//
// Two modes:
//
//   clarity-signal            serve the JSON API until Ctrl+C
//   clarity-signal <TICKER>   analyse one ticker, print the checklist, exit
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod config;
mod error;
mod indicators;
mod providers;
mod report;
mod signals;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("CLARITY_CONFIG").unwrap_or_else(|_| "clarity_config.json".into());
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();

    info!(
        default_ticker = %config.default_ticker,
        lookback_days = config.lookback_days,
        cache_ttl_secs = config.cache_ttl_secs,
        "Configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::from_config(config)?);

    // ── 3. One-shot mode ─────────────────────────────────────────────────
    if let Some(ticker) = std::env::args().nth(1) {
        let report = state
            .analyzer
            .analyze(&ticker)
            .await
            .with_context(|| format!("analysis of {ticker} failed"))?;
        println!("{}", report::render_text(&report));
        return Ok(());
    }

    // ── 4. API server ────────────────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Clarity Signal shut down complete.");
    Ok(())
}
