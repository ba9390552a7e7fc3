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

use chrono::{DateTime, TimeZone, Utc};
use pricecast_types::PricePoint;

/// The `k` cheapest points, ascending by price. Ties keep chronological order.
pub fn cheapest(window: &[PricePoint], k: usize) -> Vec<PricePoint> {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.predicted_price.total_cmp(&b.predicted_price));
    sorted.truncate(k);
    sorted
}

/// The `k` most expensive points, descending by price. Ties keep chronological order.
pub fn most_expensive(window: &[PricePoint], k: usize) -> Vec<PricePoint> {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| b.predicted_price.total_cmp(&a.predicted_price));
    sorted.truncate(k);
    sorted
}

/// Whole hours from `now` until the point starts, never negative
pub fn hours_until<Tz: TimeZone>(point: &PricePoint, now: &DateTime<Tz>) -> i64 {
    (point.timestamp - now.with_timezone(&Utc)).num_hours().max(0)
}
