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

//! Calendar-day aggregation of the 7-day forecast.

use chrono::{NaiveDate, TimeZone};
use pricecast_types::PricePoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::window::PriceStats;

/// Aggregate of all forecast hours falling on one local calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Group `points` by local date in `tz`, chronological by date
pub fn daily_summaries<Tz: TimeZone>(points: &[PricePoint], tz: &Tz) -> Vec<DailySummary> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for point in points {
        let date = point.timestamp.with_timezone(tz).date_naive();
        buckets.entry(date).or_default().push(point.predicted_price);
    }

    buckets
        .into_iter()
        .filter_map(|(date, prices)| {
            PriceStats::from_prices(prices).map(|stats| DailySummary {
                date,
                average: stats.average,
                min: stats.min,
                max: stats.max,
                count: stats.count,
            })
        })
        .collect()
}

/// Day with the lowest average; the earliest wins a tie
pub fn cheapest_day(days: &[DailySummary]) -> Option<DailySummary> {
    let mut best: Option<DailySummary> = None;
    for day in days {
        if best.is_none_or(|b| day.average < b.average) {
            best = Some(*day);
        }
    }
    best
}

/// Day with the highest average; the earliest wins a tie
pub fn most_expensive_day(days: &[DailySummary]) -> Option<DailySummary> {
    let mut best: Option<DailySummary> = None;
    for day in days {
        if best.is_none_or(|b| day.average > b.average) {
            best = Some(*day);
        }
    }
    best
}

/// Signed number of days from `today` to `date`
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}
