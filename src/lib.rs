//! SolBridge Gateway Library
//!
//! Backend for the SolBridge contract-converter site:
//! - Live Solana network analytics behind a stale-fallback cache
//! - Account balance/info and wallet token lookups over JSON-RPC

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod providers;

pub use analytics::{AnalyticsSource, LiveAnalyticsCollector, NetworkAnalytics};
pub use cache::{AnalyticsCache, CacheStats, ServedAnalytics};
pub use config::GatewayConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use providers::solana::SolanaClient;
