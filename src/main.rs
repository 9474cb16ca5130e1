//! SolBridge Gateway API Server
//!
//! Usage:
//!   cargo run
//!
//! Environment:
//!   SOLBRIDGE_HOST    - Server host (default: 0.0.0.0)
//!   PORT              - Server port (Railway), SOLBRIDGE_PORT fallback (default: 8080)
//!   SOLANA_RPC_URL    - Explicit RPC endpoint (wins over ALCHEMY_API_KEY)
//!   ALCHEMY_API_KEY   - Builds the Alchemy mainnet endpoint
//!   ANALYTICS_CACHE_MS - Analytics freshness window (default: 30000)
//!   RUST_LOG          - Log level (default: info)

use solbridge_api::api::{create_router, handlers::AppState, start_cleanup_task};
use solbridge_api::{AnalyticsCache, GatewayConfig, LiveAnalyticsCollector, SolanaClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = GatewayConfig::from_env();
    info!("🔗 Solana RPC endpoint: {}", config.masked_rpc_url());
    info!(
        "🕒 Analytics freshness window: {}ms",
        config.analytics_freshness.as_millis()
    );

    // Wire the stack: RPC client -> collector -> cache gateway -> handlers
    let solana = Arc::new(SolanaClient::new(&config)?);
    let collector = Arc::new(LiveAnalyticsCollector::new(solana.clone()));
    let cache = Arc::new(AnalyticsCache::with_freshness(
        collector,
        config.analytics_freshness,
    ));
    let state = Arc::new(AppState::new(cache.clone(), solana));

    start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = config.bind_addr().parse()?;

    info!("🚀 SolBridge API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  GET /api/analytics     - Network analytics (30s cache, stale fallback)");
    info!("  GET /api/account-info  - Account balance/owner by address");
    info!("  GET /api/wallet-tokens - SPL token holdings by address");
    info!("  GET /api/stats         - Cache statistics");
    info!("  GET /health            - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("");
    info!("🛑 Shutdown signal received");

    let stats = cache.stats().await;
    info!(
        "📊 Final cache stats: {} hits / {} misses / {} stale serves",
        stats.hits, stats.misses, stats.stale_serves
    );

    info!("👋 SolBridge API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════╗
    ║                                                  ║
    ║     S O L B R I D G E   G A T E W A Y            ║
    ║                                                  ║
    ║     Solana analytics + account lookups  v0.1.0   ║
    ║                                                  ║
    ╚══════════════════════════════════════════════════╝
    "#
    );
}
