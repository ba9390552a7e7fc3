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

//! Pure price metrics.
//!
//! Every function here is total: empty or degenerate input yields `None`,
//! an `Unknown` variant or an empty result, never a panic. None of them
//! read the clock; `now` is always passed in.

pub mod calendar;
pub mod comparison;
pub mod ranking;
pub mod top_k;
pub mod trend;
pub mod window;

pub use calendar::{DailySummary, cheapest_day, daily_summaries, days_until, most_expensive_day};
pub use comparison::{
    DayAdvice, TomorrowVsToday, WeeklyTrend, WeeklyTrendReading, compare_day_averages,
    tomorrow_vs_today, weekly_trend,
};
pub use ranking::{PriceClassification, Recommendation, Thresholds, classify, rank, recommend};
pub use top_k::{cheapest, hours_until, most_expensive};
pub use trend::{PriceTrend, TrendReading, price_trend};
pub use window::{PriceStats, day_window, end_of_day, mean_price, percent_change};
