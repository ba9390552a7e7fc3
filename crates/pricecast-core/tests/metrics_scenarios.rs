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

//! End-to-end checks of the metrics engine through the public API.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use pricecast_core::metrics::{
    self, DayAdvice, PriceStats, Recommendation, Thresholds, WeeklyTrend,
};
use pricecast_core::{MetricsEngine, SignalContext, project};
use pricecast_types::{CurrentPrice, PricePoint, Snapshot};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn hourly(start: DateTime<Utc>, prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + Duration::hours(i as i64), p))
        .collect()
}

fn snapshot(current: f64, p24: &[f64], p7: Vec<PricePoint>) -> Snapshot {
    Snapshot::new(
        Some(CurrentPrice {
            price: current,
            timestamp: now(),
        }),
        hourly(now(), p24),
        p7,
        Vec::new(),
        now(),
    )
}

#[test]
fn cheapest_hour_of_the_day_recommends_charging() {
    let snap = snapshot(100.0, &[100.0, 200.0, 300.0, 400.0], Vec::new());
    let report = MetricsEngine::new(Tz::UTC).report(&snap, now());
    let c = report.classification.unwrap();

    assert_eq!(c.thresholds.cheap, 175.0);
    assert!(c.is_cheap);
    assert_eq!(c.rank, 1);
    assert_eq!(report.recommendation, Recommendation::Charge);
}

#[test]
fn most_expensive_hour_recommends_discharging() {
    let snap = snapshot(400.0, &[100.0, 200.0, 300.0, 400.0], Vec::new());
    let report = MetricsEngine::new(Tz::UTC).report(&snap, now());
    let c = report.classification.unwrap();

    assert_eq!(c.thresholds.expensive, 325.0);
    assert!(c.is_expensive);
    assert_eq!(c.rank, 4);
    assert_eq!(report.recommendation, Recommendation::Discharge);
}

#[test]
fn flat_day_is_both_cheap_and_expensive() {
    let snap = snapshot(100.0, &[100.0; 4], Vec::new());
    let report = MetricsEngine::new(Tz::UTC).report(&snap, now());
    let c = report.classification.unwrap();

    assert_eq!(c.thresholds.cheap, 100.0);
    assert_eq!(c.thresholds.expensive, 100.0);
    assert!(c.is_cheap && c.is_expensive);
    assert_eq!(c.rank, 1);
}

#[test]
fn tomorrow_fifteen_percent_cheaper() {
    let r = metrics::compare_day_averages(100.0, 85.0).unwrap();
    assert!((r.percent + 15.0).abs() < 1e-9);
    assert!(r.tomorrow_is_cheaper);
    assert!(r.tomorrow_significantly_cheaper);
    assert_eq!(r.advice, DayAdvice::WaitForTomorrow);
}

#[test]
fn cheapest_and_most_expensive_calendar_day() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let start = |d: u32| day(d).and_hms_opt(0, 0, 0).unwrap().and_utc();

    let mut p7 = hourly(start(1), &[50.0; 24]);
    p7.extend(hourly(start(2), &[80.0; 24]));
    p7.extend(hourly(start(3), &[30.0; 24]));

    let days = metrics::daily_summaries(&p7, &Utc);
    assert_eq!(metrics::cheapest_day(&days).unwrap().date, day(3));
    assert_eq!(metrics::most_expensive_day(&days).unwrap().date, day(2));

    // 72 points is enough for a weekly reading: 50 -> 30
    let weekly = metrics::weekly_trend(&p7);
    assert_eq!(weekly.trend, WeeklyTrend::Falling);
}

#[test]
fn thirty_points_is_not_enough_for_a_weekly_trend() {
    let p7 = hourly(now(), &[60.0; 30]);
    assert_eq!(
        metrics::weekly_trend(&p7).trend,
        WeeklyTrend::InsufficientData
    );
}

#[test]
fn thresholds_stay_inside_the_day_range() {
    let windows: [&[f64]; 4] = [
        &[1.0],
        &[-40.0, -10.0, 0.0, 5.0],
        &[310.5, 12.25, 99.0, 99.0, 250.0],
        &[0.0, 0.0],
    ];
    for prices in windows {
        let stats = PriceStats::from_prices(prices.iter().copied()).unwrap();
        let t = Thresholds::from_stats(&stats);
        assert!(stats.min <= t.cheap && t.cheap <= t.expensive && t.expensive <= stats.max);
    }
}

#[test]
fn rank_never_decreases_as_price_rises() {
    let window = hourly(now(), &[42.0, 17.0, 17.0, 88.0, -3.0, 55.0]);
    let ranks: Vec<usize> = (-10..100)
        .map(|p| metrics::rank(&window, f64::from(p)))
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(ranks[0], 1);
    assert_eq!(*ranks.last().unwrap(), 7);
}

#[test]
fn every_function_is_idempotent() {
    let p24 = [70.0, 20.0, 90.0, 20.0, 55.0];
    let mut p7 = hourly(now(), &[70.0; 30]);
    p7.extend(hourly(now() + Duration::hours(30), &[40.0; 30]));
    let snap = snapshot(55.0, &p24, p7);

    let engine = MetricsEngine::new(chrono_tz::Europe::Berlin);
    let ctx = SignalContext::new("DE-BY", "EUR", chrono_tz::Europe::Berlin);
    let first = engine.report(&snap, now());
    let second = engine.report(&snap, now());
    assert_eq!(first, second);
    assert_eq!(project(&first, &snap, &ctx), project(&second, &snap, &ctx));
}

#[test]
fn empty_sequence_has_empty_day_window() {
    assert!(metrics::day_window(&[], &now()).is_empty());

    let report = MetricsEngine::new(Tz::UTC).report(&Snapshot::default(), now());
    assert!(report.today_window.is_empty());
    assert_eq!(report.recommendation, Recommendation::Unknown);
    assert_eq!(report.weekly_trend.trend, WeeklyTrend::InsufficientData);
}

#[test]
fn past_hours_never_count_as_today() {
    // forecast starts three hours before `now`
    let start = now() - Duration::hours(3);
    let snap = Snapshot::new(
        Some(CurrentPrice {
            price: 10.0,
            timestamp: now(),
        }),
        hourly(start, &[1.0, 2.0, 3.0, 40.0, 50.0]),
        Vec::new(),
        Vec::new(),
        now(),
    );

    let report = MetricsEngine::new(Tz::UTC).report(&snap, now());
    assert_eq!(report.today_window.len(), 2);
    assert_eq!(report.cheapest_hour().unwrap().predicted_price, 40.0);
    // below every remaining hour
    assert_eq!(report.classification.unwrap().rank, 1);
}
