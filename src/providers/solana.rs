//! Solana JSON-RPC Provider
//!
//! Thin client over the standard Solana JSON-RPC surface. One HTTP call per
//! method, no internal retries - callers decide how to degrade. Endpoint and
//! timeout come from [`GatewayConfig`].

use eyre::{eyre, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::GatewayConfig;

// ============================================
// SOLANA CONSTANTS
// ============================================

/// SPL Token Program ID
pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert lamports to SOL
#[inline]
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

// ============================================
// SOLANA RPC TYPES
// ============================================

/// Solana account info (jsonParsed encoding, data body ignored)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaAccountInfo {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
}

/// SPL token account info
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: TokenAmount,
    pub state: String,
}

/// Token amount
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: String,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
    pub ui_amount_string: String,
}

/// Epoch info (getEpochInfo)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    pub absolute_slot: u64,
    pub block_height: Option<u64>,
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    pub transaction_count: Option<u64>,
}

/// Performance sample (getRecentPerformanceSamples)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub slot: u64,
    pub num_transactions: u64,
    pub num_slots: u64,
    pub sample_period_secs: u64,
}

/// Supply info in lamports (getSupply value)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyInfo {
    pub total: u64,
    pub circulating: u64,
    pub non_circulating: u64,
}

// ============================================
// SOLANA RPC CLIENT
// ============================================

/// Solana RPC Client
pub struct SolanaClient {
    rpc_url: String,
    client: reqwest::Client,
}

impl SolanaClient {
    /// Create new Solana client from gateway config
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        Self::with_endpoint(&config.rpc_url, config.rpc_timeout)
    }

    /// Create a client against an explicit endpoint
    pub fn with_endpoint(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            client,
        })
    }

    /// Execute JSON-RPC call
    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        debug!("📡 RPC call: {}", method);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Request failed: {}", e))?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse response: {}", e))?;

        if let Some(error) = json.get("error") {
            return Err(eyre!("RPC error: {}", error));
        }

        let result = json
            .get("result")
            .ok_or_else(|| eyre!("No result in response"))?;

        serde_json::from_value(result.clone())
            .map_err(|e| eyre!("Failed to deserialize result: {}", e))
    }

    // ============================================
    // ACCOUNT / WALLET METHODS
    // ============================================

    /// Get account balance in lamports
    pub async fn get_balance(&self, pubkey: &str) -> Result<u64> {
        let result: serde_json::Value = self
            .call("getBalance", serde_json::json!([pubkey]))
            .await?;

        result
            .get("value")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| eyre!("No balance value in response"))
    }

    /// Get account info. Returns None when the account does not exist.
    pub async fn get_account_info(&self, pubkey: &str) -> Result<Option<SolanaAccountInfo>> {
        let params = serde_json::json!([
            pubkey,
            {"encoding": "jsonParsed"}
        ]);

        let result: serde_json::Value = self.call("getAccountInfo", params).await?;

        let value = result.get("value").cloned().unwrap_or_default();
        if value.is_null() {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| eyre!("Failed to parse account info: {}", e))
    }

    /// Get SPL token accounts held by an owner
    pub async fn get_token_accounts_by_owner(&self, owner: &str) -> Result<Vec<TokenAccountInfo>> {
        let params = serde_json::json!([
            owner,
            {"programId": TOKEN_PROGRAM},
            {"encoding": "jsonParsed"}
        ]);

        let result: serde_json::Value = self.call("getTokenAccountsByOwner", params).await?;

        let accounts = result
            .get("value")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|item| {
                        item.get("account")
                            .and_then(|a| a.get("data"))
                            .and_then(|d| d.get("parsed"))
                            .and_then(|p| p.get("info"))
                            .and_then(|i| serde_json::from_value(i.clone()).ok())
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(accounts)
    }

    // ============================================
    // NETWORK STATS METHODS
    // ============================================

    /// Get current epoch info
    pub async fn get_epoch_info(&self) -> Result<EpochInfo> {
        self.call("getEpochInfo", serde_json::json!([])).await
    }

    /// Get recent performance samples (newest first)
    pub async fn get_recent_performance_samples(
        &self,
        limit: usize,
    ) -> Result<Vec<PerformanceSample>> {
        self.call("getRecentPerformanceSamples", serde_json::json!([limit]))
            .await
    }

    /// Get SOL supply in lamports
    pub async fn get_supply(&self) -> Result<SupplyInfo> {
        let params = serde_json::json!([
            {"excludeNonCirculatingAccountsList": true}
        ]);

        let result: serde_json::Value = self.call("getSupply", params).await?;

        serde_json::from_value(result.get("value").cloned().unwrap_or_default())
            .map_err(|e| eyre!("Failed to parse supply: {}", e))
    }

    /// Get total transaction count since genesis
    pub async fn get_transaction_count(&self) -> Result<u64> {
        self.call("getTransactionCount", serde_json::json!([])).await
    }

    /// Get (active, delinquent) vote account counts
    pub async fn get_vote_account_counts(&self) -> Result<(usize, usize)> {
        let result: serde_json::Value = self.call("getVoteAccounts", serde_json::json!([])).await?;

        let count = |key: &str| {
            result
                .get(key)
                .and_then(|v| v.as_array())
                .map(|a| a.len())
                .unwrap_or(0)
        };

        Ok((count("current"), count("delinquent")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_account_info() {
        let info = serde_json::json!({
            "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "owner": "4Nd1mYvNpVbm6cu4z8candVjP8ZpXTDVMHPqkNX6WzqT",
            "state": "initialized",
            "tokenAmount": {
                "amount": "12500000",
                "decimals": 6,
                "uiAmount": 12.5,
                "uiAmountString": "12.5"
            }
        });

        let parsed: TokenAccountInfo = serde_json::from_value(info).unwrap();
        assert_eq!(parsed.mint, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
        assert_eq!(parsed.token_amount.decimals, 6);
        assert_eq!(parsed.token_amount.ui_amount_string, "12.5");
    }

    #[test]
    fn test_parse_epoch_info() {
        let info = serde_json::json!({
            "absoluteSlot": 289123456u64,
            "blockHeight": 267000000u64,
            "epoch": 669,
            "slotIndex": 123456,
            "slotsInEpoch": 432000,
            "transactionCount": 310000000000u64
        });

        let parsed: EpochInfo = serde_json::from_value(info).unwrap();
        assert_eq!(parsed.epoch, 669);
        assert_eq!(parsed.slots_in_epoch, 432_000);
        assert_eq!(parsed.transaction_count, Some(310_000_000_000));
    }

    #[test]
    fn test_parse_supply() {
        let value = serde_json::json!({
            "total": 588000000000000000u64,
            "circulating": 467000000000000000u64,
            "nonCirculating": 121000000000000000u64
        });

        let parsed: SupplyInfo = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.total, 588_000_000_000_000_000);
        assert!(parsed.circulating < parsed.total);
    }

    #[test]
    fn test_lamports_to_sol() {
        assert!((lamports_to_sol(2_500_000_000) - 2.5).abs() < f64::EPSILON);
        assert_eq!(lamports_to_sol(0), 0.0);
    }

    #[test]
    fn test_account_info_ignores_data_body() {
        // jsonParsed responses carry a data body we do not model
        let value = serde_json::json!({
            "lamports": 2039280u64,
            "owner": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
            "executable": false,
            "rentEpoch": 361,
            "data": {"program": "spl-token", "parsed": {}, "space": 165}
        });

        let parsed: SolanaAccountInfo = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.lamports, 2_039_280);
        assert!(!parsed.executable);
    }
}
