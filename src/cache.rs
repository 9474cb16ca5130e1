//! Analytics Cache Gateway
//!
//! Satu slot cache process-wide untuk live analytics, dengan stale fallback.
//! Serves fresh data inside the freshness window, refreshes on expiry, and
//! degrades to the last good snapshot when the upstream is down.
//!
//! Features:
//! - 30s freshness window (configurable) bounds upstream call rate
//! - Stale fallback: upstream failure never surfaces once a fetch succeeded
//! - Single-flight refresh: concurrent misses share one upstream call
//! - Cache HIT/MISS/stale logging + counters

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::analytics::{AnalyticsSource, NetworkAnalytics};
use crate::config::DEFAULT_ANALYTICS_CACHE_MS;
use crate::error::{AppError, AppResult};

/// Cache entry: one whole snapshot plus when it was fetched
#[derive(Clone)]
struct CacheEntry {
    value: NetworkAnalytics,
    /// Wall-clock ms, reported to clients as cachedAt
    fetched_at_ms: i64,
    /// Monotonic fetch time, drives expiry
    fetched: Instant,
}

/// What the gateway served and which branch produced it
#[derive(Debug, Clone, PartialEq)]
pub enum ServedAnalytics {
    /// Fresh fetch, cache just overwritten
    Live {
        data: NetworkAnalytics,
        timestamp: i64,
    },
    /// Entry inside the freshness window, no upstream call made
    Cached {
        data: NetworkAnalytics,
        cached_at: i64,
        expires_in: u64,
    },
    /// Expired entry served because the upstream fetch failed
    Stale {
        data: NetworkAnalytics,
        cached_at: i64,
    },
}

impl ServedAnalytics {
    pub fn data(&self) -> &NetworkAnalytics {
        match self {
            Self::Live { data, .. } | Self::Cached { data, .. } | Self::Stale { data, .. } => data,
        }
    }
}

/// Counters for the stats endpoint
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stale_serves: u64,
    pub has_entry: bool,
    pub entry_age_ms: Option<u64>,
    pub freshness_ms: u64,
}

/// Single-slot analytics cache with stale fallback.
///
/// Constructed once in main and injected into the HTTP state; the upstream
/// fetcher is injected so tests can script success/failure sequences.
pub struct AnalyticsCache {
    source: Arc<dyn AnalyticsSource>,
    slot: RwLock<Option<CacheEntry>>,
    /// Serializes refreshes. Held across the upstream call so concurrent
    /// misses line up here instead of issuing duplicate fetches.
    refresh: Mutex<()>,
    freshness: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    stale_serves: AtomicU64,
}

impl AnalyticsCache {
    /// Cache with the default 30s freshness window
    pub fn new(source: Arc<dyn AnalyticsSource>) -> Self {
        Self::with_freshness(source, Duration::from_millis(DEFAULT_ANALYTICS_CACHE_MS))
    }

    /// Cache with a custom freshness window
    pub fn with_freshness(source: Arc<dyn AnalyticsSource>, freshness: Duration) -> Self {
        Self {
            source,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
            freshness,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale_serves: AtomicU64::new(0),
        }
    }

    /// Serve analytics: cache inside the window, live on expiry, stale on
    /// upstream failure. Only a cold start plus a failed fetch errors.
    pub async fn get_analytics(&self) -> AppResult<ServedAnalytics> {
        if let Some(served) = self.serve_if_fresh().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(served);
        }

        let _refresh = self.refresh.lock().await;

        // Re-check after acquiring the lock: a concurrent caller may have
        // refreshed the slot while we waited. This is what keeps at most one
        // upstream fetch in flight per process.
        if let Some(served) = self.serve_if_fresh().await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(served);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.source.live_analytics().await {
            Ok(value) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                let entry = CacheEntry {
                    value: value.clone(),
                    fetched_at_ms: now_ms,
                    fetched: Instant::now(),
                };
                // The slot is overwritten as a whole unit, never patched
                *self.slot.write().await = Some(entry);
                info!("💾 CACHE SET (fresh for {}ms)", self.freshness.as_millis());
                Ok(ServedAnalytics::Live {
                    data: value,
                    timestamp: now_ms,
                })
            }
            Err(err) => {
                let slot = self.slot.read().await;
                match slot.as_ref() {
                    // Degraded path: expired entry beats an error response.
                    // The entry keeps its original fetchedAt untouched.
                    Some(entry) => {
                        self.stale_serves.fetch_add(1, Ordering::Relaxed);
                        warn!("⚠️ Analytics fetch failed, serving stale cache: {}", err);
                        Ok(ServedAnalytics::Stale {
                            data: entry.value.clone(),
                            cached_at: entry.fetched_at_ms,
                        })
                    }
                    None => {
                        error!("❌ Analytics fetch failed with empty cache: {}", err);
                        Err(AppError::upstream_unavailable(err.to_string()))
                    }
                }
            }
        }
    }

    /// Returns the entry as `Cached` when it is inside the freshness window
    async fn serve_if_fresh(&self) -> Option<ServedAnalytics> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        let age = entry.fetched.elapsed();
        if age >= self.freshness {
            return None;
        }
        let expires_in = (self.freshness - age).as_millis() as u64;
        info!("✅ CACHE HIT ({}ms left)", expires_in);
        Some(ServedAnalytics::Cached {
            data: entry.value.clone(),
            cached_at: entry.fetched_at_ms,
            expires_in,
        })
    }

    /// Snapshot of the counters
    pub async fn stats(&self) -> CacheStats {
        let slot = self.slot.read().await;
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_serves: self.stale_serves.load(Ordering::Relaxed),
            has_entry: slot.is_some(),
            entry_age_ms: slot.as_ref().map(|e| e.fetched.elapsed().as_millis() as u64),
            freshness_ms: self.freshness.as_millis() as u64,
        }
    }
}
