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
use async_trait::async_trait;
use chrono::Utc;
use pricecast_types::{CurrentPrice, Horizon, PricePoint, Snapshot};

/// Hours of past prices fetched with every snapshot
pub const DEFAULT_HISTORICAL_HOURS: u32 = 168;

/// Generic source of forecast data for one region
/// The refresh scheduler uses this trait and never knows about HTTP details
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Region this source serves
    fn region_id(&self) -> &str;

    /// Most recent observed price, `None` when the service has none
    async fn current_price(&self) -> Result<Option<CurrentPrice>>;

    /// Hourly forecast for the given horizon
    async fn predictions(&self, horizon: Horizon) -> Result<Vec<PricePoint>>;

    /// Observed prices over the last `hours`
    async fn historical(&self, hours: u32) -> Result<Vec<PricePoint>>;

    fn historical_hours(&self) -> u32 {
        DEFAULT_HISTORICAL_HOURS
    }

    /// Fetch all four streams and normalize them into a snapshot.
    ///
    /// Any failed read fails the whole fetch; partial snapshots are never built.
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let predictions_24h = self.predictions(Horizon::Next24h).await?;
        let predictions_7d = self.predictions(Horizon::Next7d).await?;
        let historical = self.historical(self.historical_hours()).await?;
        let current_price = self.current_price().await?;

        Ok(Snapshot::new(
            current_price,
            predictions_24h,
            predictions_7d,
            historical,
            Utc::now(),
        ))
    }
}
