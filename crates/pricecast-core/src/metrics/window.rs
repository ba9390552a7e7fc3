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

//! Day-scoped filtering and price statistics.
//!
//! "Today" always means from `now` up to 23:59:59 of the local calendar day
//! of `now`. The timezone travels with `now`, so the same instant can yield
//! different windows for different regions.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pricecast_types::PricePoint;
use serde::{Deserialize, Serialize};

/// Last instant still counted as part of the local day of `now` (23:59:59)
pub fn end_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let date = now.date_naive();

    if let Some(local) = date
        .and_hms_opt(23, 59, 59)
        .and_then(|naive| tz.from_local_datetime(&naive).latest())
    {
        return local.with_timezone(&Utc);
    }

    // 23:59:59 falls into a DST gap: the day ends one second before the next one starts
    date.succ_opt()
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map_or_else(
            || now.with_timezone(&Utc),
            |start| start.with_timezone(&Utc) - Duration::seconds(1),
        )
}

/// Points with `now <= timestamp <= end_of_day(now)`, in input order
pub fn day_window<Tz: TimeZone>(points: &[PricePoint], now: &DateTime<Tz>) -> Vec<PricePoint> {
    let start = now.with_timezone(&Utc);
    let end = end_of_day(now);

    points
        .iter()
        .filter(|p| p.timestamp >= start && p.timestamp <= end)
        .copied()
        .collect()
}

/// Min/max/mean over a set of prices (currency/MWh)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub count: usize,
}

impl PriceStats {
    /// Returns `None` for an empty input
    pub fn from_prices(prices: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0_usize;

        for price in prices {
            min = min.min(price);
            max = max.max(price);
            sum += price;
            count += 1;
        }

        (count > 0).then(|| Self {
            min,
            max,
            average: sum / count as f64,
            count,
        })
    }

    pub fn from_points(points: &[PricePoint]) -> Option<Self> {
        Self::from_prices(points.iter().map(|p| p.predicted_price))
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// Arithmetic mean of the forecast prices, `None` when empty
pub fn mean_price(points: &[PricePoint]) -> Option<f64> {
    PriceStats::from_points(points).map(|s| s.average)
}

/// Signed change from `base` to `value` in percent.
///
/// `None` when `base` is zero, so callers never divide by it.
pub fn percent_change(base: f64, value: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let change = (value - base) / base * 100.0;
    change.is_finite().then_some(change)
}
