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

//! Day-over-day and week-over-week comparisons.

use chrono::{DateTime, TimeZone};
use pricecast_types::PricePoint;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::window::{day_window, mean_price, percent_change};

/// A day is "significantly" cheaper when it is below 90% of the other
pub const SIGNIFICANT_FACTOR: f64 = 0.9;

/// Minimum number of 7-day points before a weekly trend is reported
pub const WEEKLY_MIN_POINTS: usize = 48;
/// Hours averaged at each end of the week
pub const WEEKLY_EDGE_HOURS: usize = 24;
pub const WEEKLY_TREND_PERCENT: f64 = 10.0;
pub const WEEKLY_MOVEMENT_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayAdvice {
    WaitForTomorrow,
    UseEnergyToday,
    SimilarPrices,
}

impl DayAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WaitForTomorrow => "Wait for tomorrow",
            Self::UseEnergyToday => "Use energy today",
            Self::SimilarPrices => "Similar prices",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TomorrowVsToday {
    pub today_average: f64,
    pub tomorrow_average: f64,
    pub percent: f64,
    pub tomorrow_is_cheaper: bool,
    pub tomorrow_significantly_cheaper: bool,
    pub today_significantly_cheaper: bool,
    pub advice: DayAdvice,
}

/// Compare two day averages. `None` when today's average is zero.
pub fn compare_day_averages(today: f64, tomorrow: f64) -> Option<TomorrowVsToday> {
    let percent = percent_change(today, tomorrow)?;
    let tomorrow_significantly_cheaper = tomorrow < today * SIGNIFICANT_FACTOR;
    let today_significantly_cheaper = today < tomorrow * SIGNIFICANT_FACTOR;

    let advice = if tomorrow_significantly_cheaper {
        DayAdvice::WaitForTomorrow
    } else if today_significantly_cheaper {
        DayAdvice::UseEnergyToday
    } else {
        DayAdvice::SimilarPrices
    };

    Some(TomorrowVsToday {
        today_average: today,
        tomorrow_average: tomorrow,
        percent,
        tomorrow_is_cheaper: tomorrow < today,
        tomorrow_significantly_cheaper,
        today_significantly_cheaper,
        advice,
    })
}

/// Mean of today's remaining 24h forecast against the mean of tomorrow's
/// local calendar day in the 7-day forecast.
pub fn tomorrow_vs_today<Tz: TimeZone>(
    predictions_24h: &[PricePoint],
    predictions_7d: &[PricePoint],
    now: &DateTime<Tz>,
) -> Option<TomorrowVsToday> {
    let today = mean_price(&day_window(predictions_24h, now))?;

    let tomorrow_date = now.date_naive().succ_opt()?;
    let tz = now.timezone();
    let tomorrow: Vec<PricePoint> = predictions_7d
        .iter()
        .filter(|p| p.timestamp.with_timezone(&tz).date_naive() == tomorrow_date)
        .copied()
        .collect();
    let tomorrow = mean_price(&tomorrow)?;

    compare_day_averages(today, tomorrow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyTrend {
    Rising,
    Falling,
    Stable,
    InsufficientData,
}

impl WeeklyTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
            Self::InsufficientData => "insufficient_data",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rising => "Rising ↗",
            Self::Falling => "Falling ↘",
            Self::Stable => "Stable →",
            Self::InsufficientData => "Insufficient data",
        }
    }
}

impl fmt::Display for WeeklyTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrendReading {
    pub trend: WeeklyTrend,
    pub first_day_average: Option<f64>,
    pub last_day_average: Option<f64>,
    pub week_average: Option<f64>,
    pub change_percent: Option<f64>,
    pub prices_increasing: bool,
    pub prices_decreasing: bool,
}

impl WeeklyTrendReading {
    fn insufficient(week_average: Option<f64>) -> Self {
        Self {
            trend: WeeklyTrend::InsufficientData,
            first_day_average: None,
            last_day_average: None,
            week_average,
            change_percent: None,
            prices_increasing: false,
            prices_decreasing: false,
        }
    }
}

/// First 24 points against the last 24 points of the 7-day forecast.
///
/// Positional: the ends are taken by index, not by calendar date.
pub fn weekly_trend(predictions_7d: &[PricePoint]) -> WeeklyTrendReading {
    let week_average = mean_price(predictions_7d);
    if predictions_7d.len() < WEEKLY_MIN_POINTS {
        return WeeklyTrendReading::insufficient(week_average);
    }

    let tail_start = predictions_7d.len() - WEEKLY_EDGE_HOURS;
    let first = predictions_7d.get(..WEEKLY_EDGE_HOURS).and_then(mean_price);
    let last = predictions_7d.get(tail_start..).and_then(mean_price);

    let (Some(first), Some(last)) = (first, last) else {
        return WeeklyTrendReading::insufficient(week_average);
    };
    let Some(change) = percent_change(first, last) else {
        return WeeklyTrendReading::insufficient(week_average);
    };

    let trend = if change > WEEKLY_TREND_PERCENT {
        WeeklyTrend::Rising
    } else if change < -WEEKLY_TREND_PERCENT {
        WeeklyTrend::Falling
    } else {
        WeeklyTrend::Stable
    };

    WeeklyTrendReading {
        trend,
        first_day_average: Some(first),
        last_day_average: Some(last),
        week_average,
        change_percent: Some(change),
        prices_increasing: change > WEEKLY_MOVEMENT_PERCENT,
        prices_decreasing: change < -WEEKLY_MOVEMENT_PERCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn hourly(start: DateTime<Utc>, prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + Duration::hours(i as i64), p))
            .collect()
    }

    #[test]
    fn test_tomorrow_significantly_cheaper() {
        let r = compare_day_averages(100.0, 85.0).unwrap();
        assert!((r.percent - (-15.0)).abs() < 1e-9);
        assert!(r.tomorrow_is_cheaper);
        assert!(r.tomorrow_significantly_cheaper);
        assert!(!r.today_significantly_cheaper);
        assert_eq!(r.advice, DayAdvice::WaitForTomorrow);
        assert_eq!(r.advice.label(), "Wait for tomorrow");
    }

    #[test]
    fn test_today_significantly_cheaper() {
        let r = compare_day_averages(80.0, 100.0).unwrap();
        assert!(!r.tomorrow_is_cheaper);
        assert_eq!(r.advice, DayAdvice::UseEnergyToday);
    }

    #[test]
    fn test_similar_prices() {
        let r = compare_day_averages(100.0, 95.0).unwrap();
        assert!(r.tomorrow_is_cheaper);
        assert!(!r.tomorrow_significantly_cheaper);
        assert_eq!(r.advice, DayAdvice::SimilarPrices);
    }

    #[test]
    fn test_zero_today_average_is_absent() {
        assert!(compare_day_averages(0.0, 50.0).is_none());
    }

    #[test]
    fn test_tomorrow_vs_today_from_sequences() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        // today's window: 20:00..23:00 at 100; the 24h forecast also reaches into tomorrow
        let p24 = hourly(now, &[100.0, 100.0, 100.0, 100.0, 1.0, 1.0]);
        let tomorrow = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        let mut p7 = hourly(now, &[500.0; 4]);
        p7.extend(hourly(tomorrow, &[85.0; 24]));
        p7.extend(hourly(tomorrow + Duration::days(1), &[1.0; 24]));

        let r = tomorrow_vs_today(&p24, &p7, &now).unwrap();
        assert_eq!(r.today_average, 100.0);
        assert_eq!(r.tomorrow_average, 85.0);
        assert!(r.tomorrow_significantly_cheaper);
    }

    #[test]
    fn test_tomorrow_vs_today_missing_side() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let p24 = hourly(now, &[100.0]);
        assert!(tomorrow_vs_today(&p24, &p24, &now).is_none());
        assert!(tomorrow_vs_today(&[], &p24, &now).is_none());
    }

    #[test]
    fn test_weekly_trend_needs_two_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let reading = weekly_trend(&hourly(start, &[50.0; 30]));
        assert_eq!(reading.trend, WeeklyTrend::InsufficientData);
        assert_eq!(reading.week_average, Some(50.0));
        assert!(reading.change_percent.is_none());
    }

    #[test]
    fn test_weekly_trend_rising() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut prices = vec![100.0; 24];
        prices.extend([90.0; 24]);
        prices.extend([120.0; 24]);

        let reading = weekly_trend(&hourly(start, &prices));
        assert_eq!(reading.trend, WeeklyTrend::Rising);
        assert_eq!(reading.first_day_average, Some(100.0));
        assert_eq!(reading.last_day_average, Some(120.0));
        assert!(reading.prices_increasing);
        assert!(!reading.prices_decreasing);
    }

    #[test]
    fn test_weekly_trend_falling_and_stable() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        let mut prices = vec![100.0; 24];
        prices.extend([80.0; 24]);
        assert_eq!(weekly_trend(&hourly(start, &prices)).trend, WeeklyTrend::Falling);

        let mut prices = vec![100.0; 24];
        prices.extend([93.0; 24]);
        let reading = weekly_trend(&hourly(start, &prices));
        assert_eq!(reading.trend, WeeklyTrend::Stable);
        assert!(reading.prices_decreasing);
    }

    #[test]
    fn test_weekly_trend_zero_first_day() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut prices = vec![0.0; 24];
        prices.extend([50.0; 24]);
        assert_eq!(
            weekly_trend(&hourly(start, &prices)).trend,
            WeeklyTrend::InsufficientData
        );
    }
}
