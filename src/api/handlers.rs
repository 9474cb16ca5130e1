//! API Request Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use super::types::*;
use crate::cache::AnalyticsCache;
use crate::providers::solana::{lamports_to_sol, SolanaClient};

/// Shared application state
pub struct AppState {
    pub cache: Arc<AnalyticsCache>,
    pub solana: Arc<SolanaClient>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(cache: Arc<AnalyticsCache>, solana: Arc<SolanaClient>) -> Self {
        Self {
            cache,
            solana,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Query shape shared by the address-keyed lookups
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

// ============================================
// Live Analytics (cache gateway)
// ============================================

/// Serves analytics through the cache gateway. The only 500 here is the
/// cold-start-plus-failed-fetch case; every other branch answers 200.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<AnalyticsResponse>) {
    match state.cache.get_analytics().await {
        Ok(served) => (StatusCode::OK, Json(AnalyticsResponse::from_served(served))),
        Err(err) => {
            error!("❌ [{}] {}", err.code_str(), err.message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyticsResponse::error(err.message)),
            )
        }
    }
}

// ============================================
// Account Info
// ============================================

/// Straight pass-through over getBalance + getAccountInfo. No caching,
/// no fallback - RPC failures surface as 500.
pub async fn get_account_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddressQuery>,
) -> (StatusCode, Json<AccountInfoResponse>) {
    let address = match query.address.as_deref().map(str::trim) {
        Some(addr) if !addr.is_empty() => addr.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AccountInfoResponse::error("Address parameter is required")),
            )
        }
    };

    let lookup = tokio::try_join!(
        state.solana.get_balance(&address),
        state.solana.get_account_info(&address),
    );

    match lookup {
        Ok((lamports, account)) => {
            let exists = account.is_some();
            let owner = account.map(|a| a.owner);
            (
                StatusCode::OK,
                Json(AccountInfoResponse::found(
                    lamports_to_sol(lamports),
                    exists,
                    owner,
                    lamports,
                )),
            )
        }
        Err(err) => {
            error!("❌ Account info lookup failed for {}: {}", address, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AccountInfoResponse::error(err.to_string())),
            )
        }
    }
}

// ============================================
// Wallet Tokens
// ============================================

pub async fn get_wallet_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddressQuery>,
) -> (StatusCode, Json<WalletTokensResponse>) {
    let address = match query.address.as_deref().map(str::trim) {
        Some(addr) if !addr.is_empty() => addr.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(WalletTokensResponse::error("Address parameter required")),
            )
        }
    };

    match state.solana.get_token_accounts_by_owner(&address).await {
        Ok(accounts) => {
            let tokens = accounts
                .into_iter()
                .map(|account| WalletToken {
                    mint: account.mint,
                    amount: account.token_amount.ui_amount_string,
                    decimals: account.token_amount.decimals,
                })
                .collect();
            (StatusCode::OK, Json(WalletTokensResponse::listed(tokens)))
        }
        Err(err) => {
            error!("❌ Wallet tokens lookup failed for {}: {}", address, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WalletTokensResponse::error(err.to_string())),
            )
        }
    }
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
        cache: state.cache.stats().await,
    })
}
