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

//! Projection of a [`PriceReport`] onto named signals.
//!
//! This is the only place where prices leave currency/MWh: every `price`
//! attribute is currency/kWh (5 decimals), every `*_mwh` attribute keeps the
//! service unit (2 decimals) and percentages are rounded to one decimal.
//! Nothing here computes a metric; it only converts and rounds.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use pricecast_types::{PricePoint, Snapshot};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::engine::PriceReport;
use crate::metrics::{DailySummary, WeeklyTrend, days_until, hours_until};

const KWH_DECIMALS: i32 = 5;
const MWH_DECIMALS: i32 = 2;
const PERCENT_DECIMALS: i32 = 1;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// currency/MWh -> currency/kWh, rounded for display
pub fn mwh_to_kwh(price_mwh: f64) -> f64 {
    round_to(price_mwh / 1000.0, KWH_DECIMALS)
}

pub fn round_mwh(price_mwh: f64) -> f64 {
    round_to(price_mwh, MWH_DECIMALS)
}

pub fn round_percent(percent: f64) -> f64 {
    round_to(percent, PERCENT_DECIMALS)
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn format_day(date: NaiveDate) -> String {
    date.format("%A, %b %d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Sensor,
    Binary,
}

/// One named output with a state and an attribute bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub unique_id: String,
    pub key: &'static str,
    pub name: &'static str,
    pub kind: SignalKind,
    pub state: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub icon: &'static str,
    pub attributes: Value,
}

impl Signal {
    pub fn is_on(&self) -> bool {
        self.state.as_bool().unwrap_or(false)
    }
}

/// Every signal of one region, as served to consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSet {
    pub region: String,
    pub generated_at: DateTime<Utc>,
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub signals: Vec<Signal>,
}

impl SignalSet {
    pub fn get(&self, key: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.key == key)
    }

    pub fn with_freshness(mut self, stale: bool, last_error: Option<String>) -> Self {
        self.stale = stale;
        self.last_error = last_error;
        self
    }
}

/// Region-specific presentation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalContext {
    pub region: String,
    pub currency: String,
    pub timezone: Tz,
}

impl SignalContext {
    pub fn new(region: impl Into<String>, currency: impl Into<String>, timezone: Tz) -> Self {
        Self {
            region: region.into(),
            currency: currency.into(),
            timezone,
        }
    }

    fn kwh_unit(&self) -> String {
        format!("{}/kWh", self.currency)
    }
}

struct Builder<'a> {
    ctx: &'a SignalContext,
    signals: Vec<Signal>,
}

impl Builder<'_> {
    fn push(
        &mut self,
        key: &'static str,
        name: &'static str,
        kind: SignalKind,
        icon: &'static str,
        unit: Option<String>,
        (state, attributes): (Value, Value),
    ) {
        self.signals.push(Signal {
            unique_id: format!("{}_{key}", self.ctx.region),
            key,
            name,
            kind,
            state,
            unit,
            icon,
            attributes,
        });
    }

    fn sensor(
        &mut self,
        key: &'static str,
        name: &'static str,
        icon: &'static str,
        body: (Value, Value),
    ) {
        self.push(key, name, SignalKind::Sensor, icon, None, body);
    }

    fn price_sensor(
        &mut self,
        key: &'static str,
        name: &'static str,
        icon: &'static str,
        body: (Value, Value),
    ) {
        let unit = Some(self.ctx.kwh_unit());
        self.push(key, name, SignalKind::Sensor, icon, unit, body);
    }

    /// Missing data turns into `false` with no attributes
    fn binary(
        &mut self,
        key: &'static str,
        name: &'static str,
        icon: &'static str,
        body: Option<(bool, Value)>,
    ) {
        let (on, attributes) = body.unwrap_or_else(|| (false, empty()));
        self.push(key, name, SignalKind::Binary, icon, None, (Value::Bool(on), attributes));
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

fn absent() -> (Value, Value) {
    (Value::Null, empty())
}

fn hour_entry(p: &PricePoint) -> Value {
    json!({
        "time": format_time(p.timestamp),
        "price": mwh_to_kwh(p.predicted_price),
        "price_mwh": round_mwh(p.predicted_price),
    })
}

/// Build all signals for one region from a report and the snapshot it was computed from
pub fn project(report: &PriceReport, snapshot: &Snapshot, ctx: &SignalContext) -> SignalSet {
    let mut b = Builder {
        ctx,
        signals: Vec::with_capacity(19),
    };

    b.price_sensor("current_price", "Current Price", "mdi:flash", current_price(report, ctx));
    b.price_sensor(
        "next_hour_price",
        "Next Hour Price",
        "mdi:clock-outline",
        next_hour_price(report, ctx),
    );
    b.price_sensor(
        "avg_price_today",
        "Average Price Today",
        "mdi:chart-bell-curve",
        average_today(report),
    );
    b.price_sensor(
        "cheapest_hour",
        "Cheapest Hour Today",
        "mdi:currency-eur-off",
        extreme_hour(report, &report.cheapest_today, "cheapest"),
    );
    b.price_sensor(
        "expensive_hour",
        "Most Expensive Hour Today",
        "mdi:arrow-up-bold",
        extreme_hour(report, &report.most_expensive_today, "expensive"),
    );
    b.sensor("price_trend", "Price Trend", "mdi:trending-up", price_trend(report));
    b.sensor("recommendation", "Recommendation", "mdi:lightbulb", recommendation(report));
    b.price_sensor(
        "forecast",
        "Forecast",
        "mdi:chart-timeline-variant",
        forecast(snapshot),
    );
    b.price_sensor(
        "7day_forecast",
        "7 Day Price Forecast",
        "mdi:calendar-week",
        seven_day_forecast(report, snapshot, ctx),
    );
    b.sensor(
        "cheapest_day_7d",
        "Cheapest Day (7d)",
        "mdi:calendar-star",
        extreme_day(report, report.cheapest_day, true),
    );
    b.sensor(
        "expensive_day_7d",
        "Most Expensive Day (7d)",
        "mdi:calendar-alert",
        extreme_day(report, report.most_expensive_day, false),
    );
    b.push(
        "tomorrow_vs_today",
        "Tomorrow vs Today",
        SignalKind::Sensor,
        "mdi:compare-horizontal",
        Some("%".to_owned()),
        tomorrow_vs_today(report),
    );
    b.sensor(
        "weekly_trend",
        "Weekly Price Trend",
        "mdi:chart-line-variant",
        weekly_trend(report),
    );

    let c = report.classification;
    b.binary(
        "is_cheap_now",
        "Is Cheap Now",
        "mdi:cash-check",
        c.map(|c| {
            (
                c.is_cheap,
                json!({
                    "current_price": mwh_to_kwh(c.current_price),
                    "cheap_threshold": mwh_to_kwh(c.thresholds.cheap),
                    "min_price_today": mwh_to_kwh(c.stats.min),
                    "max_price_today": mwh_to_kwh(c.stats.max),
                }),
            )
        }),
    );
    b.binary(
        "is_expensive_now",
        "Is Expensive Now",
        "mdi:cash-remove",
        c.map(|c| {
            (
                c.is_expensive,
                json!({
                    "current_price": mwh_to_kwh(c.current_price),
                    "expensive_threshold": mwh_to_kwh(c.thresholds.expensive),
                    "min_price_today": mwh_to_kwh(c.stats.min),
                    "max_price_today": mwh_to_kwh(c.stats.max),
                }),
            )
        }),
    );
    for (key, name, icon, n) in [
        ("is_in_cheapest_3", "Is In Cheapest 3 Hours", "mdi:medal", 3),
        ("is_in_cheapest_6", "Is In Cheapest 6 Hours", "mdi:star-circle", 6),
    ] {
        b.binary(
            key,
            name,
            icon,
            c.map(|c| {
                (
                    c.is_in_cheapest(n),
                    json!({
                        "rank": c.rank,
                        "total_hours": c.total,
                        "current_price": mwh_to_kwh(c.current_price),
                    }),
                )
            }),
        );
    }
    b.binary(
        "is_below_average",
        "Is Below Average Price",
        "mdi:trending-down",
        c.map(|c| {
            (
                c.is_below_average,
                json!({
                    "current_price": mwh_to_kwh(c.current_price),
                    "average_price": mwh_to_kwh(c.stats.average),
                    "difference": mwh_to_kwh(c.difference_from_average()),
                    "difference_percent": c.vs_average_percent.map(round_percent),
                }),
            )
        }),
    );
    b.binary(
        "tomorrow_is_cheaper",
        "Tomorrow Is Cheaper",
        "mdi:calendar-arrow-right",
        report.tomorrow_vs_today.map(|t| {
            (
                t.tomorrow_is_cheaper,
                json!({
                    "today_average": mwh_to_kwh(t.today_average),
                    "tomorrow_average": mwh_to_kwh(t.tomorrow_average),
                    "difference_percent": round_percent(t.percent),
                    "significantly_cheaper": t.tomorrow_significantly_cheaper,
                }),
            )
        }),
    );

    SignalSet {
        region: ctx.region.clone(),
        generated_at: report.generated_at,
        stale: false,
        last_error: None,
        signals: b.signals,
    }
}

fn current_price(report: &PriceReport, ctx: &SignalContext) -> (Value, Value) {
    let Some(current) = report.current_price else {
        return absent();
    };

    let mut attrs = json!({
        "last_updated": format_time(current.timestamp),
        "region": ctx.region,
        "price_mwh": round_mwh(current.price),
    });
    if let Some(c) = report.classification
        && let Value::Object(map) = &mut attrs
    {
        map.insert("price_rank_today".to_owned(), json!(c.rank));
        map.insert("total_hours_today".to_owned(), json!(c.total));
        map.insert(
            "vs_average_percent".to_owned(),
            json!(c.vs_average_percent.map(round_percent)),
        );
        map.insert("is_below_average".to_owned(), json!(c.is_below_average));
        map.insert("is_in_cheapest_3".to_owned(), json!(c.is_in_cheapest_3));
        map.insert("is_in_cheapest_6".to_owned(), json!(c.is_in_cheapest_6));
    }

    (json!(mwh_to_kwh(current.price)), attrs)
}

fn next_hour_price(report: &PriceReport, ctx: &SignalContext) -> (Value, Value) {
    let Some(next) = report.next_hour else {
        return absent();
    };

    (
        json!(mwh_to_kwh(next.predicted_price)),
        json!({
            "forecast_time": format_time(next.timestamp),
            "confidence_lower": mwh_to_kwh(next.confidence_lower.unwrap_or(0.0)),
            "confidence_upper": mwh_to_kwh(next.confidence_upper.unwrap_or(0.0)),
            "price_mwh": round_mwh(next.predicted_price),
            "region": ctx.region,
        }),
    )
}

fn average_today(report: &PriceReport) -> (Value, Value) {
    let Some(stats) = report.today_stats else {
        return absent();
    };

    (
        json!(mwh_to_kwh(stats.average)),
        json!({
            "min_price_today": mwh_to_kwh(stats.min),
            "max_price_today": mwh_to_kwh(stats.max),
            "price_spread": mwh_to_kwh(stats.spread()),
            "price_spread_mwh": round_mwh(stats.spread()),
            "data_points": stats.count,
        }),
    )
}

fn extreme_hour(report: &PriceReport, hours: &[PricePoint], label: &str) -> (Value, Value) {
    let Some(first) = hours.first() else {
        return absent();
    };
    let until = hours_until(first, &report.generated_at);

    let mut attrs = Map::new();
    attrs.insert(format!("{label}_time"), json!(format_time(first.timestamp)));
    attrs.insert(format!("hours_until_{label}"), json!(until));
    attrs.insert("starts_in_next_hour".to_owned(), json!(until <= 1));
    attrs.insert(
        format!("{label}_hours_today"),
        Value::Array(hours.iter().map(hour_entry).collect()),
    );

    (json!(mwh_to_kwh(first.predicted_price)), Value::Object(attrs))
}

fn price_trend(report: &PriceReport) -> (Value, Value) {
    let t = report.trend;
    let attrs = match (t.current_price, t.avg_next_3h) {
        (Some(current), Some(avg)) => json!({
            "current_price": round_mwh(current),
            "avg_next_3h": round_mwh(avg),
            "change_percent": t.change_percent.map(round_percent),
        }),
        _ => empty(),
    };
    (json!(t.trend.as_str()), attrs)
}

fn recommendation(report: &PriceReport) -> (Value, Value) {
    let r = report.recommendation;
    (
        json!(r.as_str()),
        json!({
            "description": r.description(),
            "icon_suggestion": r.icon(),
        }),
    )
}

fn forecast(snapshot: &Snapshot) -> (Value, Value) {
    let state = snapshot
        .predictions_24h
        .first()
        .map_or(Value::Null, |p| json!(mwh_to_kwh(p.predicted_price)));

    let forecast_24h: Vec<Value> = snapshot
        .predictions_24h
        .iter()
        .map(|p| {
            json!({
                "time": format_time(p.timestamp),
                "price": mwh_to_kwh(p.predicted_price),
                "conf_lower": mwh_to_kwh(p.confidence_lower.unwrap_or(0.0)),
                "conf_upper": mwh_to_kwh(p.confidence_upper.unwrap_or(0.0)),
            })
        })
        .collect();

    (
        state,
        json!({
            "forecast_24h": forecast_24h,
            "forecast_7d": price_list(&snapshot.predictions_7d),
            "forecast_24h_count": snapshot.predictions_24h.len(),
            "forecast_7d_count": snapshot.predictions_7d.len(),
        }),
    )
}

fn price_list(points: &[PricePoint]) -> Vec<Value> {
    points
        .iter()
        .map(|p| {
            json!({
                "time": format_time(p.timestamp),
                "price": mwh_to_kwh(p.predicted_price),
            })
        })
        .collect()
}

fn daily_entry(day: &DailySummary) -> Value {
    json!({
        "date": day.date.to_string(),
        "avg_price": mwh_to_kwh(day.average),
        "min_price": mwh_to_kwh(day.min),
        "max_price": mwh_to_kwh(day.max),
    })
}

fn seven_day_forecast(
    report: &PriceReport,
    snapshot: &Snapshot,
    ctx: &SignalContext,
) -> (Value, Value) {
    let Some(stats) = report.forecast_7d_stats else {
        return absent();
    };

    (
        json!(mwh_to_kwh(stats.average)),
        json!({
            "forecast_7d_full": price_list(&snapshot.predictions_7d),
            "daily_averages": report.daily.iter().map(daily_entry).collect::<Vec<_>>(),
            "min_price_7d": mwh_to_kwh(stats.min),
            "max_price_7d": mwh_to_kwh(stats.max),
            "avg_price_7d": mwh_to_kwh(stats.average),
            "total_hours": stats.count,
            "region": ctx.region,
        }),
    )
}

fn extreme_day(
    report: &PriceReport,
    day: Option<DailySummary>,
    with_all_days: bool,
) -> (Value, Value) {
    let Some(day) = day else {
        return absent();
    };
    let until = days_until(day.date, report.today);

    let mut attrs = Map::new();
    attrs.insert("date".to_owned(), json!(day.date.to_string()));
    attrs.insert("average_price".to_owned(), json!(mwh_to_kwh(day.average)));
    attrs.insert("days_until".to_owned(), json!(until));
    attrs.insert("is_today".to_owned(), json!(until == 0));
    attrs.insert("is_tomorrow".to_owned(), json!(until == 1));
    if with_all_days {
        let all: Map<String, Value> = report
            .daily
            .iter()
            .map(|d| (d.date.to_string(), json!(mwh_to_kwh(d.average))))
            .collect();
        attrs.insert("all_daily_averages".to_owned(), Value::Object(all));
    }

    (json!(format_day(day.date)), Value::Object(attrs))
}

fn tomorrow_vs_today(report: &PriceReport) -> (Value, Value) {
    let Some(t) = report.tomorrow_vs_today else {
        return absent();
    };

    (
        json!(round_percent(t.percent)),
        json!({
            "today_average": mwh_to_kwh(t.today_average),
            "tomorrow_average": mwh_to_kwh(t.tomorrow_average),
            "tomorrow_cheaper": t.tomorrow_is_cheaper,
            "recommendation": t.advice.label(),
        }),
    )
}

fn weekly_trend(report: &PriceReport) -> (Value, Value) {
    let w = report.weekly_trend;
    if w.trend == WeeklyTrend::InsufficientData {
        return (json!(w.trend.as_str()), empty());
    }

    (
        json!(w.trend.as_str()),
        json!({
            "label": w.trend.label(),
            "first_day_average": w.first_day_average.map(mwh_to_kwh),
            "last_day_average": w.last_day_average.map(mwh_to_kwh),
            "week_average": w.week_average.map(mwh_to_kwh),
            "change_percent": w.change_percent.map(round_percent),
            "prices_increasing": w.prices_increasing,
            "prices_decreasing": w.prices_decreasing,
        }),
    )
}
