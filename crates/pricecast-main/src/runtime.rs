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

use anyhow::Result;
use chrono::{DateTime, Utc};
use pricecast_client::ForecastClient;
use pricecast_core::{
    MetricsEngine, RefreshScheduler, SignalContext, SignalSet, SnapshotStore, StoreStatus, project,
};
use pricecast_types::region_name;
use std::sync::Arc;

use crate::config::{PriceCastConfig, RegionSettings};

/// Everything one configured region owns: its source, store, engine and scheduler
#[derive(Debug)]
pub struct RegionRuntime {
    pub id: String,
    pub name: &'static str,
    pub client: Arc<ForecastClient>,
    pub store: Arc<SnapshotStore>,
    pub engine: MetricsEngine,
    pub context: SignalContext,
    pub scheduler: Arc<RefreshScheduler>,
}

impl RegionRuntime {
    pub fn new(config: &PriceCastConfig, region: &RegionSettings) -> Result<Self> {
        let timezone = region.tz()?;
        let client = Arc::new(
            ForecastClient::with_timeout(
                &config.source.api_url,
                &region.id,
                config.source.timeout(),
            )?
            .with_retry_config(config.source.max_retries, config.source.retry_delay())
            .with_historical_hours(config.source.historical_hours),
        );
        let store = Arc::new(SnapshotStore::new());
        let scheduler = Arc::new(
            RefreshScheduler::new(Arc::clone(&client) as _, Arc::clone(&store))
                .with_interval(config.refresh.interval()),
        );

        Ok(Self {
            id: region.id.clone(),
            name: region_name(&region.id).unwrap_or("Unknown region"),
            client,
            store,
            engine: MetricsEngine::new(timezone),
            context: SignalContext::new(region.id.clone(), config.currency.clone(), timezone),
            scheduler,
        })
    }

    /// Build one runtime per configured region
    pub fn all(config: &PriceCastConfig) -> Result<Vec<Arc<Self>>> {
        config
            .regions
            .iter()
            .map(|region| Self::new(config, region).map(Arc::new))
            .collect()
    }

    pub fn status(&self) -> StoreStatus {
        self.store.status()
    }

    /// Project the current snapshot, `None` before the first successful refresh
    pub fn signal_set(&self, now: DateTime<Utc>) -> Option<SignalSet> {
        let snapshot = self.store.current()?;
        let status = self.store.status();
        let report = self.engine.report(&snapshot, now);

        let set = project(&report, &snapshot, &self.context);
        Some(set.with_freshness(status.is_stale(), status.last_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_types::Snapshot;

    #[test]
    fn test_runtime_per_region() {
        let mut config = PriceCastConfig::default();
        config.regions.push(RegionSettings {
            id: "DE-BY".to_owned(),
            timezone: "Europe/Vienna".to_owned(),
        });

        let runtimes = RegionRuntime::all(&config).unwrap();
        assert_eq!(runtimes.len(), 2);
        assert_eq!(runtimes[1].name, "Bavaria (Bayern)");
        assert_eq!(runtimes[1].scheduler.region(), "DE-BY");
        assert_eq!(runtimes[1].engine.timezone(), chrono_tz::Europe::Vienna);
    }

    #[test]
    fn test_signal_set_requires_data() {
        let config = PriceCastConfig::default();
        let runtime = RegionRuntime::new(&config, &config.regions[0]).unwrap();
        assert!(runtime.signal_set(Utc::now()).is_none());

        runtime.store.commit(Snapshot::default());
        runtime.store.record_failure("timeout");

        let set = runtime.signal_set(Utc::now()).unwrap();
        assert!(set.stale);
        assert_eq!(set.last_error.as_deref(), Some("timeout"));
        assert_eq!(set.region, "DE");
    }
}
