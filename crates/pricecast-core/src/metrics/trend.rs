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

use pricecast_types::PricePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::window::{mean_price, percent_change};

/// Number of upcoming hours averaged for the short-term trend
pub const TREND_LOOKAHEAD_HOURS: usize = 3;
pub const RISING_FACTOR: f64 = 1.05;
pub const FALLING_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

impl PriceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub trend: PriceTrend,
    pub current_price: Option<f64>,
    pub avg_next_3h: Option<f64>,
    pub change_percent: Option<f64>,
}

impl TrendReading {
    fn unknown(current_price: Option<f64>, avg_next_3h: Option<f64>) -> Self {
        Self {
            trend: PriceTrend::Unknown,
            current_price,
            avg_next_3h,
            change_percent: None,
        }
    }
}

/// Compare the next three forecast hours against the current price
pub fn price_trend(predictions_24h: &[PricePoint], current: Option<f64>) -> TrendReading {
    let upcoming = predictions_24h
        .get(..TREND_LOOKAHEAD_HOURS)
        .unwrap_or(predictions_24h);
    let avg = mean_price(upcoming);

    let (Some(current), Some(avg)) = (current, avg) else {
        return TrendReading::unknown(current, avg);
    };

    let trend = if avg > current * RISING_FACTOR {
        PriceTrend::Rising
    } else if avg < current * FALLING_FACTOR {
        PriceTrend::Falling
    } else {
        PriceTrend::Stable
    };

    TrendReading {
        trend,
        current_price: Some(current),
        avg_next_3h: Some(avg),
        change_percent: percent_change(current, avg),
    }
}
