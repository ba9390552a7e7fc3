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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============= Forecast Data (currency per MWh) =============

/// A single hourly price forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start of the hour this forecast applies to
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,

    /// Forecast price (currency/MWh), may be negative
    pub predicted_price: f64,

    #[serde(default)]
    pub confidence_lower: Option<f64>,

    #[serde(default)]
    pub confidence_upper: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, predicted_price: f64) -> Self {
        Self {
            timestamp,
            predicted_price,
            confidence_lower: None,
            confidence_upper: None,
        }
    }

    pub fn with_confidence(mut self, lower: f64, upper: f64) -> Self {
        self.confidence_lower = Some(lower);
        self.confidence_upper = Some(upper);
        self
    }
}

/// Most recent observed price, independent of the forecasts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrice {
    /// Observed price (currency/MWh)
    pub price: f64,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

/// Forecast horizon offered by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    Next24h,
    Next7d,
}

impl Horizon {
    /// Path segment used by the predictions endpoint
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Next24h => "next-24h",
            Self::Next7d => "next-7d",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Immutable bundle of everything the metrics engine reads.
///
/// A snapshot is replaced wholesale on every refresh and shared behind an
/// `Arc`; nothing mutates it after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_price: Option<CurrentPrice>,
    /// Chronological, first entry is the next hour
    pub predictions_24h: Vec<PricePoint>,
    /// Chronological, spans the upcoming 7 days
    pub predictions_7d: Vec<PricePoint>,
    /// Past prices, informational only
    pub historical: Vec<PricePoint>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Build a snapshot from raw source data.
    ///
    /// Points with non-finite prices are dropped and every sequence is put in
    /// chronological order (stable, so equal timestamps keep source order).
    pub fn new(
        current_price: Option<CurrentPrice>,
        predictions_24h: Vec<PricePoint>,
        predictions_7d: Vec<PricePoint>,
        historical: Vec<PricePoint>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            current_price: current_price.filter(|c| c.price.is_finite()),
            predictions_24h: normalize(predictions_24h),
            predictions_7d: normalize(predictions_7d),
            historical: normalize(historical),
            fetched_at,
        }
    }

    /// True when there is nothing to derive metrics from
    pub fn is_empty(&self) -> bool {
        self.current_price.is_none()
            && self.predictions_24h.is_empty()
            && self.predictions_7d.is_empty()
    }

    pub fn current_price_value(&self) -> Option<f64> {
        self.current_price.map(|c| c.price)
    }
}

fn normalize(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.retain(|p| p.predicted_price.is_finite());
    if !points.is_sorted_by_key(|p| p.timestamp) {
        points.sort_by_key(|p| p.timestamp);
    }
    points
}
