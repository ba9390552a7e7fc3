// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of PriceCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Periodic snapshot refresh for one region.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::store::SnapshotStore;
use crate::traits::ForecastSource;

/// Default time between two refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Committed { points_24h: usize, points_7d: usize },
    Failed { error: String },
    /// Another refresh of the same region was still running
    AlreadyInFlight,
}

/// Drives a [`ForecastSource`] into a [`SnapshotStore`] on a fixed interval
pub struct RefreshScheduler {
    region: String,
    source: Arc<dyn ForecastSource>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    in_flight: Mutex<()>,
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("region", &self.region)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl RefreshScheduler {
    pub fn new(source: Arc<dyn ForecastSource>, store: Arc<SnapshotStore>) -> Self {
        Self {
            region: source.region_id().to_owned(),
            source,
            store,
            interval: DEFAULT_REFRESH_INTERVAL,
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Fetch and commit one snapshot.
    ///
    /// Never issues requests while another refresh of this region is running.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("⏭️ [REFRESH] {} already in flight, skipping", self.region);
            return RefreshOutcome::AlreadyInFlight;
        };

        match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                let points_24h = snapshot.predictions_24h.len();
                let points_7d = snapshot.predictions_7d.len();
                if snapshot.is_empty() {
                    warn!("⚠️ [REFRESH] {} returned no usable data", self.region);
                }
                self.store.commit(snapshot);
                info!(
                    "✅ [REFRESH] {}: {} hourly / {} weekly points",
                    self.region, points_24h, points_7d
                );
                RefreshOutcome::Committed {
                    points_24h,
                    points_7d,
                }
            }
            Err(e) => {
                let error = format!("{e:#}");
                self.store.record_failure(error.clone());
                let failures = self.store.status().consecutive_failures;
                error!(
                    "❌ [REFRESH] {} failed ({} in a row), keeping previous data: {}",
                    self.region, failures, error
                );
                RefreshOutcome::Failed { error }
            }
        }
    }

    /// Refresh immediately, then on every tick until `shutdown` turns true
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "🔄 [REFRESH] {} scheduler started ({}s interval)",
            self.region,
            self.interval.as_secs()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.refresh_now().await;
                }
            }
        }

        info!("🛑 [REFRESH] {} scheduler stopped", self.region);
    }

    pub fn spawn(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pricecast_types::{CurrentPrice, Horizon, PricePoint};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MockSource {
        fail: AtomicBool,
        fetches: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl ForecastSource for MockSource {
        fn region_id(&self) -> &str {
            "DE"
        }

        async fn current_price(&self) -> Result<Option<CurrentPrice>> {
            Ok(Some(CurrentPrice {
                price: 90.0,
                timestamp: Utc::now(),
            }))
        }

        async fn predictions(&self, horizon: Horizon) -> Result<Vec<PricePoint>> {
            if horizon == Horizon::Next24h {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
            }
            if self.fail.load(Ordering::SeqCst) {
                bail!("service unavailable");
            }
            let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
            Ok(vec![PricePoint::new(ts, 100.0)])
        }

        async fn historical(&self, _hours: u32) -> Result<Vec<PricePoint>> {
            Ok(Vec::new())
        }
    }

    fn scheduler(source: Arc<MockSource>) -> Arc<RefreshScheduler> {
        Arc::new(RefreshScheduler::new(source, Arc::new(SnapshotStore::new())))
    }

    #[tokio::test]
    async fn test_refresh_commits_snapshot() {
        let source = Arc::new(MockSource::default());
        let scheduler = scheduler(source);

        let outcome = scheduler.refresh_now().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Committed {
                points_24h: 1,
                points_7d: 1
            }
        );

        let snapshot = scheduler.store().current().unwrap();
        assert_eq!(snapshot.current_price_value(), Some(90.0));
    }

    #[tokio::test]
    async fn test_failure_keeps_last_good_snapshot() {
        let source = Arc::new(MockSource::default());
        let scheduler = scheduler(Arc::clone(&source));

        scheduler.refresh_now().await;
        let good = scheduler.store().current().unwrap();

        source.fail.store(true, Ordering::SeqCst);
        let outcome = scheduler.refresh_now().await;
        assert!(matches!(outcome, RefreshOutcome::Failed { ref error } if error.contains("service unavailable")));

        let status = scheduler.store().status();
        assert!(status.is_stale());
        assert_eq!(status.consecutive_failures, 1);
        assert!(Arc::ptr_eq(&scheduler.store().current().unwrap(), &good));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_is_rejected() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(MockSource {
            gate: Some(Arc::clone(&gate)),
            ..MockSource::default()
        });
        let scheduler = scheduler(Arc::clone(&source));

        let running = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            async move { scheduler.refresh_now().await }
        });

        // wait until the first refresh is parked inside the source
        while source.fetches.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            scheduler.refresh_now().await,
            RefreshOutcome::AlreadyInFlight
        );
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        gate.notify_one();
        let first = running.await.unwrap();
        assert!(matches!(first, RefreshOutcome::Committed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_refreshes_on_interval_until_shutdown() {
        let source = Arc::new(MockSource::default());
        let scheduler = Arc::new(
            RefreshScheduler::new(
                Arc::clone(&source) as Arc<dyn ForecastSource>,
                Arc::new(SnapshotStore::new()),
            )
            .with_interval(Duration::from_secs(600)),
        );

        let (tx, rx) = watch::channel(false);
        let handle = Arc::clone(&scheduler).spawn(rx);

        // ticks at 0s, 600s and 1200s
        tokio::time::sleep(Duration::from_secs(1250)).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);

        tx.send(true).unwrap();
        handle.await.unwrap();
        assert!(scheduler.store().current().is_some());
    }
}
