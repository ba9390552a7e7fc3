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

use super::window::{PriceStats, percent_change};

/// Position of the cheap threshold inside the day's price range
pub const CHEAP_QUANTILE: f64 = 0.25;
/// Position of the expensive threshold inside the day's price range
pub const EXPENSIVE_QUANTILE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cheap: f64,
    pub expensive: f64,
}

impl Thresholds {
    /// Linear interpolation between the window's min and max.
    ///
    /// For a flat window both thresholds collapse onto the single price.
    pub fn from_stats(stats: &PriceStats) -> Self {
        let range = stats.spread();
        Self {
            cheap: stats.min + range * CHEAP_QUANTILE,
            expensive: stats.min + range * EXPENSIVE_QUANTILE,
        }
    }
}

/// 1-based rank of `current` among the window prices (ties share the lower rank)
pub fn rank(window: &[PricePoint], current: f64) -> usize {
    1 + window
        .iter()
        .filter(|p| p.predicted_price < current)
        .count()
}

/// Battery/appliance action suggested for the current hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Charge,
    Discharge,
    NeutralCheap,
    NeutralExpensive,
    Unknown,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "charge",
            Self::Discharge => "discharge",
            Self::NeutralCheap => "neutral_cheap",
            Self::NeutralExpensive => "neutral_expensive",
            Self::Unknown => "unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Charge => "Good time to charge batteries or run appliances",
            Self::Discharge => "Good time to use stored energy or sell to grid",
            Self::NeutralCheap => "Price below average but not optimal",
            Self::NeutralExpensive => "Price above average, consider waiting",
            Self::Unknown => "Insufficient data for recommendation",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Charge => "mdi:battery-charging",
            Self::Discharge => "mdi:battery-arrow-up",
            Self::NeutralCheap => "mdi:battery-50",
            Self::NeutralExpensive => "mdi:battery-outline",
            Self::Unknown => "mdi:help-circle",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the current price sits inside today's remaining window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceClassification {
    pub stats: PriceStats,
    pub thresholds: Thresholds,
    pub current_price: f64,
    pub rank: usize,
    pub total: usize,
    pub is_cheap: bool,
    pub is_expensive: bool,
    pub is_in_cheapest_3: bool,
    pub is_in_cheapest_6: bool,
    pub is_below_average: bool,
    /// Signed distance from the window average, `None` when the average is zero
    pub vs_average_percent: Option<f64>,
    pub recommendation: Recommendation,
}

impl PriceClassification {
    pub fn is_in_cheapest(&self, n: usize) -> bool {
        self.rank <= n
    }

    pub fn difference_from_average(&self) -> f64 {
        self.current_price - self.stats.average
    }
}

/// Classify `current` against the day window.
///
/// Returns `None` when the window is empty or the current price is unknown.
pub fn classify(window: &[PricePoint], current: Option<f64>) -> Option<PriceClassification> {
    let current = current?;
    let stats = PriceStats::from_points(window)?;
    let thresholds = Thresholds::from_stats(&stats);
    let rank = rank(window, current);

    let is_cheap = current <= thresholds.cheap;
    let is_expensive = current >= thresholds.expensive;
    let is_below_average = current < stats.average;

    let recommendation = if is_cheap {
        Recommendation::Charge
    } else if is_expensive {
        Recommendation::Discharge
    } else if is_below_average {
        Recommendation::NeutralCheap
    } else {
        Recommendation::NeutralExpensive
    };

    Some(PriceClassification {
        stats,
        thresholds,
        current_price: current,
        rank,
        total: window.len(),
        is_cheap,
        is_expensive,
        is_in_cheapest_3: rank <= 3,
        is_in_cheapest_6: rank <= 6,
        is_below_average,
        vs_average_percent: percent_change(stats.average, current),
        recommendation,
    })
}

pub fn recommend(window: &[PricePoint], current: Option<f64>) -> Recommendation {
    classify(window, current).map_or(Recommendation::Unknown, |c| c.recommendation)
}
