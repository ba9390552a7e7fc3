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
use pricecast_types::{CurrentPrice, PricePoint};
use serde::Deserialize;

/// Body of `/api/historical/{region}/combined`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalResponse {
    #[serde(default)]
    pub historical_data: Vec<HistoricalRecord>,
}

/// Observed price for one hour (currency/MWh)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HistoricalRecord {
    #[serde(deserialize_with = "pricecast_types::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl From<HistoricalRecord> for PricePoint {
    fn from(record: HistoricalRecord) -> Self {
        PricePoint::new(record.timestamp, record.price)
    }
}

impl From<HistoricalRecord> for CurrentPrice {
    fn from(record: HistoricalRecord) -> Self {
        CurrentPrice {
            price: record.price,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_historical_response() {
        let json = r#"{
            "region": "DE",
            "historical_data": [
                {"timestamp": "2024-01-01T10:00:00Z", "price": 81.2, "source": "entsoe"},
                {"timestamp": "2024-01-01T11:00:00", "price": -4.5}
            ]
        }"#;

        let response: HistoricalResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.historical_data.len(), 2);

        let point: PricePoint = response.historical_data[1].into();
        assert_eq!(point.predicted_price, -4.5);
        assert!(point.confidence_lower.is_none());
    }

    #[test]
    fn test_missing_list_is_empty() {
        let response: HistoricalResponse = serde_json::from_str("{}").unwrap();
        assert!(response.historical_data.is_empty());
    }
}
