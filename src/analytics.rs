//! Live Network Analytics
//!
//! Aggregates one `NetworkAnalytics` snapshot per fetch from concurrent
//! Solana RPC calls. The snapshot is what the dashboard renders: slot/epoch
//! position, throughput, supply and validator counts.
//!
//! The [`AnalyticsSource`] trait is the seam the cache gateway consumes -
//! production wires in [`LiveAnalyticsCollector`], tests script their own.

use async_trait::async_trait;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::providers::solana::{lamports_to_sol, PerformanceSample, SolanaClient};

/// How many performance samples to average TPS over (1 sample ≈ 60s)
const PERF_SAMPLE_WINDOW: usize = 6;

/// One immutable snapshot of network-level analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalytics {
    /// Current absolute slot
    pub slot: u64,
    /// Current epoch
    pub epoch: u64,
    /// Progress through the current epoch, percent
    pub epoch_progress: f64,
    /// Average transactions per second over the sample window
    pub tps: f64,
    /// Total transactions since genesis
    pub transactions_total: u64,
    /// Circulating supply in SOL
    pub circulating_supply_sol: f64,
    /// Total supply in SOL
    pub total_supply_sol: f64,
    /// Vote accounts currently voting
    pub active_validators: usize,
    /// Vote accounts marked delinquent
    pub delinquent_validators: usize,
    /// Wall-clock ms when the snapshot was taken
    pub sampled_at: i64,
}

/// Upstream source of analytics snapshots
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn live_analytics(&self) -> Result<NetworkAnalytics>;
}

/// Production analytics source backed by Solana RPC
pub struct LiveAnalyticsCollector {
    client: Arc<SolanaClient>,
}

impl LiveAnalyticsCollector {
    pub fn new(client: Arc<SolanaClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalyticsSource for LiveAnalyticsCollector {
    async fn live_analytics(&self) -> Result<NetworkAnalytics> {
        // One failed call fails the snapshot; the cache gateway owns degradation
        let (epoch, samples, supply, tx_count, (active, delinquent)) = tokio::try_join!(
            self.client.get_epoch_info(),
            self.client.get_recent_performance_samples(PERF_SAMPLE_WINDOW),
            self.client.get_supply(),
            self.client.get_transaction_count(),
            self.client.get_vote_account_counts(),
        )?;

        let snapshot = NetworkAnalytics {
            slot: epoch.absolute_slot,
            epoch: epoch.epoch,
            epoch_progress: epoch_progress(epoch.slot_index, epoch.slots_in_epoch),
            tps: network_tps(&samples),
            transactions_total: tx_count,
            circulating_supply_sol: lamports_to_sol(supply.circulating),
            total_supply_sol: lamports_to_sol(supply.total),
            active_validators: active,
            delinquent_validators: delinquent,
            sampled_at: chrono::Utc::now().timestamp_millis(),
        };

        debug!(
            "📊 Snapshot: slot={} epoch={} tps={:.1} validators={}",
            snapshot.slot, snapshot.epoch, snapshot.tps, snapshot.active_validators
        );

        Ok(snapshot)
    }
}

/// Average TPS across performance samples
fn network_tps(samples: &[PerformanceSample]) -> f64 {
    let txs: u64 = samples.iter().map(|s| s.num_transactions).sum();
    let secs: u64 = samples.iter().map(|s| s.sample_period_secs).sum();
    if secs == 0 {
        return 0.0;
    }
    txs as f64 / secs as f64
}

/// Percent progress through the epoch
fn epoch_progress(slot_index: u64, slots_in_epoch: u64) -> f64 {
    if slots_in_epoch == 0 {
        return 0.0;
    }
    slot_index as f64 / slots_in_epoch as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(num_transactions: u64, sample_period_secs: u64) -> PerformanceSample {
        PerformanceSample {
            slot: 0,
            num_transactions,
            num_slots: 150,
            sample_period_secs,
        }
    }

    #[test]
    fn test_network_tps() {
        let samples = vec![sample(120_000, 60), sample(180_000, 60)];
        let tps = network_tps(&samples);
        assert!((tps - 2500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_network_tps_empty() {
        assert_eq!(network_tps(&[]), 0.0);
    }

    #[test]
    fn test_epoch_progress() {
        assert!((epoch_progress(108_000, 432_000) - 25.0).abs() < f64::EPSILON);
        assert_eq!(epoch_progress(5, 0), 0.0);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let snapshot = NetworkAnalytics {
            slot: 1,
            epoch: 2,
            epoch_progress: 50.0,
            tps: 2500.0,
            transactions_total: 3,
            circulating_supply_sol: 4.0,
            total_supply_sol: 5.0,
            active_validators: 6,
            delinquent_validators: 0,
            sampled_at: 7,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("epochProgress").is_some());
        assert!(json.get("transactionsTotal").is_some());
        assert!(json.get("sampledAt").is_some());
    }
}
