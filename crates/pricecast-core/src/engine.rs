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

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use pricecast_types::{CurrentPrice, PricePoint, Snapshot};
use serde::Serialize;

use crate::metrics::{
    self, DailySummary, PriceClassification, PriceStats, Recommendation, TomorrowVsToday,
    TrendReading, WeeklyTrendReading,
};

/// Length of the cheapest/most expensive hour lists
pub const TOP_HOURS: usize = 6;

/// Every metric derived from one snapshot at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub generated_at: DateTime<Utc>,
    /// Local calendar date of `generated_at`
    pub today: NaiveDate,
    pub current_price: Option<CurrentPrice>,
    pub next_hour: Option<PricePoint>,
    pub today_window: Vec<PricePoint>,
    pub today_stats: Option<PriceStats>,
    pub classification: Option<PriceClassification>,
    pub recommendation: Recommendation,
    pub cheapest_today: Vec<PricePoint>,
    pub most_expensive_today: Vec<PricePoint>,
    pub trend: TrendReading,
    pub forecast_7d_stats: Option<PriceStats>,
    pub daily: Vec<DailySummary>,
    pub cheapest_day: Option<DailySummary>,
    pub most_expensive_day: Option<DailySummary>,
    pub tomorrow_vs_today: Option<TomorrowVsToday>,
    pub weekly_trend: WeeklyTrendReading,
}

impl PriceReport {
    pub fn cheapest_hour(&self) -> Option<&PricePoint> {
        self.cheapest_today.first()
    }

    pub fn most_expensive_hour(&self) -> Option<&PricePoint> {
        self.most_expensive_today.first()
    }
}

/// Stateless metrics evaluator for one region.
///
/// The only thing it owns is the region's timezone, which decides where
/// "today" ends and how the 7-day forecast is split into days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsEngine {
    timezone: Tz,
}

impl MetricsEngine {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn local_now(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    pub fn report(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> PriceReport {
        let local = self.local_now(now);
        let current = snapshot.current_price_value();

        let today_window = metrics::day_window(&snapshot.predictions_24h, &local);
        let classification = metrics::classify(&today_window, current);
        let recommendation =
            classification.map_or(Recommendation::Unknown, |c| c.recommendation);

        let daily = metrics::daily_summaries(&snapshot.predictions_7d, &self.timezone);

        PriceReport {
            generated_at: now,
            today: local.date_naive(),
            current_price: snapshot.current_price,
            next_hour: snapshot.predictions_24h.first().copied(),
            today_stats: PriceStats::from_points(&today_window),
            classification,
            recommendation,
            cheapest_today: metrics::cheapest(&today_window, TOP_HOURS),
            most_expensive_today: metrics::most_expensive(&today_window, TOP_HOURS),
            trend: metrics::price_trend(&snapshot.predictions_24h, current),
            forecast_7d_stats: PriceStats::from_points(&snapshot.predictions_7d),
            cheapest_day: metrics::cheapest_day(&daily),
            most_expensive_day: metrics::most_expensive_day(&daily),
            tomorrow_vs_today: metrics::tomorrow_vs_today(
                &snapshot.predictions_24h,
                &snapshot.predictions_7d,
                &local,
            ),
            weekly_trend: metrics::weekly_trend(&snapshot.predictions_7d),
            daily,
            today_window,
        }
    }

    /// The `hours` cheapest hours still ahead today
    pub fn cheapest_hours(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        hours: usize,
    ) -> Vec<PricePoint> {
        let window = metrics::day_window(&snapshot.predictions_24h, &self.local_now(now));
        metrics::cheapest(&window, hours)
    }

    /// The `hours` most expensive hours still ahead today
    pub fn most_expensive_hours(
        &self,
        snapshot: &Snapshot,
        now: DateTime<Utc>,
        hours: usize,
    ) -> Vec<PricePoint> {
        let window = metrics::day_window(&snapshot.predictions_24h, &self.local_now(now));
        metrics::most_expensive(&window, hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pricecast_types::CurrentPrice;

    fn hourly(start: DateTime<Utc>, prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + Duration::hours(i as i64), p))
            .collect()
    }

    fn snapshot(now: DateTime<Utc>) -> Snapshot {
        Snapshot::new(
            Some(CurrentPrice {
                price: 100.0,
                timestamp: now,
            }),
            hourly(now, &[100.0, 200.0, 300.0, 400.0]),
            hourly(now, &[100.0; 72]),
            Vec::new(),
            now,
        )
    }

    #[test]
    fn test_report_in_utc() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let engine = MetricsEngine::new(Tz::UTC);
        let report = engine.report(&snapshot(now), now);

        assert_eq!(report.today_window.len(), 4);
        assert_eq!(report.recommendation, Recommendation::Charge);
        assert_eq!(report.cheapest_hour().unwrap().predicted_price, 100.0);
        assert_eq!(report.most_expensive_hour().unwrap().predicted_price, 400.0);
        assert_eq!(report.next_hour.unwrap().predicted_price, 100.0);
        assert_eq!(report.daily.len(), 4);
        assert_eq!(report.today, now.date_naive());
    }

    #[test]
    fn test_timezone_shrinks_today_window() {
        // 20:00 UTC is 21:00 in Berlin; the local day ends at 22:59:59 UTC
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let engine = MetricsEngine::new(chrono_tz::Europe::Berlin);
        let report = engine.report(&snapshot(now), now);

        assert_eq!(report.today_window.len(), 3);
        assert_eq!(report.classification.unwrap().total, 3);
    }

    #[test]
    fn test_empty_snapshot_report() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let report = MetricsEngine::new(Tz::UTC).report(&Snapshot::default(), now);

        assert!(report.classification.is_none());
        assert_eq!(report.recommendation, Recommendation::Unknown);
        assert!(report.cheapest_today.is_empty());
        assert!(report.cheapest_day.is_none());
        assert!(report.tomorrow_vs_today.is_none());
    }

    #[test]
    fn test_report_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let engine = MetricsEngine::new(chrono_tz::Europe::Berlin);
        let snap = snapshot(now);
        assert_eq!(engine.report(&snap, now), engine.report(&snap, now));
    }

    #[test]
    fn test_hour_queries() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let engine = MetricsEngine::new(Tz::UTC);
        let snap = snapshot(now);

        let cheap: Vec<f64> = engine
            .cheapest_hours(&snap, now, 2)
            .iter()
            .map(|p| p.predicted_price)
            .collect();
        assert_eq!(cheap, vec![100.0, 200.0]);

        let expensive = engine.most_expensive_hours(&snap, now, 1);
        assert_eq!(expensive[0].predicted_price, 400.0);
    }
}
