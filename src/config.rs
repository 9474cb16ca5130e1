//! Configuration module for the SolBridge gateway
//! All knobs come from the environment with sane defaults.

use std::time::Duration;

/// Public mainnet-beta RPC, used when no provider key is configured.
/// Heavily rate limited - fine for local dev, not for production.
pub const PUBLIC_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default freshness window for the analytics cache (30 seconds)
pub const DEFAULT_ANALYTICS_CACHE_MS: u64 = 30_000;

/// Configuration for the gateway server
pub struct GatewayConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Solana JSON-RPC endpoint
    pub rpc_url: String,

    /// Timeout for RPC calls
    pub rpc_timeout: Duration,

    /// Freshness window for the analytics cache
    pub analytics_freshness: Duration,
}

impl GatewayConfig {
    /// Build configuration from the environment.
    ///
    /// Railway injects PORT; SOLBRIDGE_HOST / SOLBRIDGE_PORT are the
    /// local-dev overrides. Invalid numeric values fall back to defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("SOLBRIDGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .or_else(|_| std::env::var("SOLBRIDGE_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let rpc_url = resolve_rpc_url(
            std::env::var("SOLANA_RPC_URL").ok(),
            std::env::var("ALCHEMY_API_KEY").ok(),
        );

        let rpc_timeout_secs: u64 = std::env::var("RPC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let analytics_cache_ms: u64 = std::env::var("ANALYTICS_CACHE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ANALYTICS_CACHE_MS);

        Self {
            host,
            port,
            rpc_url,
            rpc_timeout: Duration::from_secs(rpc_timeout_secs),
            analytics_freshness: Duration::from_millis(analytics_cache_ms),
        }
    }

    /// Bind address string ("host:port")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// RPC URL with any embedded API key masked, safe for logs
    pub fn masked_rpc_url(&self) -> String {
        match self.rpc_url.rfind("/v2/") {
            Some(idx) => format!("{}/v2/***", &self.rpc_url[..idx]),
            None => self.rpc_url.clone(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Resolve the RPC endpoint: explicit URL wins, then an Alchemy key,
/// then the public endpoint.
fn resolve_rpc_url(explicit: Option<String>, alchemy_key: Option<String>) -> String {
    if let Some(url) = explicit.filter(|u| !u.is_empty()) {
        return url;
    }
    if let Some(key) = alchemy_key.filter(|k| !k.is_empty() && k != "YOUR_API_KEY") {
        return format!("https://solana-mainnet.g.alchemy.com/v2/{}", key);
    }
    PUBLIC_RPC_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_url_wins() {
        let url = resolve_rpc_url(
            Some("https://rpc.example.com".to_string()),
            Some("abc123".to_string()),
        );
        assert_eq!(url, "https://rpc.example.com");
    }

    #[test]
    fn test_alchemy_key_builds_url() {
        let url = resolve_rpc_url(None, Some("abc123".to_string()));
        assert_eq!(url, "https://solana-mainnet.g.alchemy.com/v2/abc123");
    }

    #[test]
    fn test_placeholder_key_rejected() {
        let url = resolve_rpc_url(None, Some("YOUR_API_KEY".to_string()));
        assert_eq!(url, PUBLIC_RPC_URL);
    }

    #[test]
    fn test_public_fallback() {
        let url = resolve_rpc_url(None, None);
        assert_eq!(url, PUBLIC_RPC_URL);
    }

    #[test]
    fn test_masked_rpc_url() {
        let config = GatewayConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rpc_url: "https://solana-mainnet.g.alchemy.com/v2/secret".to_string(),
            rpc_timeout: Duration::from_secs(10),
            analytics_freshness: Duration::from_millis(30_000),
        };
        assert_eq!(
            config.masked_rpc_url(),
            "https://solana-mainnet.g.alchemy.com/v2/***"
        );
        assert!(!config.masked_rpc_url().contains("secret"));
    }
}
