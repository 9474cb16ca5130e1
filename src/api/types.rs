//! API Response Types
//!
//! Wire shapes the frontend consumes. Everything serializes camelCase and
//! optional fields drop out of the JSON entirely rather than appearing null.

use serde::Serialize;

use crate::analytics::NetworkAnalytics;
use crate::cache::{CacheStats, ServedAnalytics};

/// Warning attached to stale-cache serves
pub const STALE_WARNING: &str = "Using cached data due to error";

// ============================================
// Analytics
// ============================================

/// `GET /api/analytics` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NetworkAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// "live" | "cache" | "stale-cache" | "error"
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl AnalyticsResponse {
    /// Map a gateway result onto the wire shape, metadata per branch
    pub fn from_served(served: ServedAnalytics) -> Self {
        match served {
            ServedAnalytics::Live { data, timestamp } => Self {
                success: true,
                data: Some(data),
                error: None,
                source: "live",
                cached_at: None,
                expires_in: None,
                warning: None,
                timestamp: Some(timestamp),
            },
            ServedAnalytics::Cached {
                data,
                cached_at,
                expires_in,
            } => Self {
                success: true,
                data: Some(data),
                error: None,
                source: "cache",
                cached_at: Some(cached_at),
                expires_in: Some(expires_in),
                warning: None,
                timestamp: None,
            },
            ServedAnalytics::Stale { data, cached_at } => Self {
                success: true,
                data: Some(data),
                error: None,
                source: "stale-cache",
                cached_at: Some(cached_at),
                expires_in: None,
                warning: Some(STALE_WARNING),
                timestamp: None,
            },
        }
    }

    /// Cold-start failure: no cache entry has ever existed
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            source: "error",
            cached_at: None,
            expires_in: None,
            warning: None,
            timestamp: None,
        }
    }
}

// ============================================
// Account Info
// ============================================

/// `GET /api/account-info` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoResponse {
    pub success: bool,
    /// Balance in SOL, 4 decimal places
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lamports: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AccountInfoResponse {
    pub fn found(balance_sol: f64, exists: bool, owner: Option<String>, lamports: u64) -> Self {
        Self {
            success: true,
            balance: Some(format!("{:.4}", balance_sol)),
            exists: Some(exists),
            owner,
            lamports: Some(lamports),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            balance: None,
            exists: None,
            owner: None,
            lamports: None,
            error: Some(message.into()),
        }
    }
}

// ============================================
// Wallet Tokens
// ============================================

/// One SPL token holding
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletToken {
    pub mint: String,
    /// UI amount string as reported by the RPC node
    pub amount: String,
    pub decimals: u8,
}

/// `GET /api/wallet-tokens` response. The error shape keeps an empty
/// tokens array so the frontend can map over it unconditionally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTokensResponse {
    pub success: bool,
    pub tokens: Vec<WalletToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WalletTokensResponse {
    pub fn listed(tokens: Vec<WalletToken>) -> Self {
        let count = tokens.len();
        Self {
            success: true,
            tokens,
            count: Some(count),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            tokens: Vec::new(),
            count: None,
            error: Some(message.into()),
        }
    }
}

// ============================================
// Health / Stats
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cache: CacheStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> NetworkAnalytics {
        NetworkAnalytics {
            slot: 1,
            epoch: 2,
            epoch_progress: 3.0,
            tps: 4.0,
            transactions_total: 5,
            circulating_supply_sol: 6.0,
            total_supply_sol: 7.0,
            active_validators: 8,
            delinquent_validators: 0,
            sampled_at: 9,
        }
    }

    #[test]
    fn test_cache_response_fields() {
        let response = AnalyticsResponse::from_served(ServedAnalytics::Cached {
            data: snapshot(),
            cached_at: 1_700_000_000_000,
            expires_in: 21_000,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "cache");
        assert_eq!(json["cachedAt"], 1_700_000_000_000i64);
        assert_eq!(json["expiresIn"], 21_000);
        assert!(json.get("timestamp").is_none());
        assert!(json.get("warning").is_none());
    }

    #[test]
    fn test_live_response_fields() {
        let response = AnalyticsResponse::from_served(ServedAnalytics::Live {
            data: snapshot(),
            timestamp: 1_700_000_000_000,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["source"], "live");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        assert!(json.get("cachedAt").is_none());
        assert!(json.get("expiresIn").is_none());
    }

    #[test]
    fn test_stale_response_carries_warning() {
        let response = AnalyticsResponse::from_served(ServedAnalytics::Stale {
            data: snapshot(),
            cached_at: 42,
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["source"], "stale-cache");
        assert_eq!(json["warning"], STALE_WARNING);
        assert_eq!(json["cachedAt"], 42);
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(AnalyticsResponse::error("boom".into())).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["source"], "error");
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_account_balance_formatting() {
        let response = AccountInfoResponse::found(1.23456789, true, Some("11111".into()), 1_234_567_890);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["balance"], "1.2346");
        assert_eq!(json["lamports"], 1_234_567_890u64);
    }

    #[test]
    fn test_wallet_tokens_error_keeps_empty_array() {
        let json = serde_json::to_value(WalletTokensResponse::error("rpc down")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["tokens"].as_array().unwrap().is_empty());
        assert!(json.get("count").is_none());
    }
}
