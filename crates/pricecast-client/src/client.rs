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

use crate::errors::{ClientError, ClientResult};
use crate::types::HistoricalResponse;
use async_trait::async_trait;
use pricecast_core::{DEFAULT_HISTORICAL_HOURS, ForecastSource};
use pricecast_types::{CurrentPrice, Horizon, PricePoint};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Check scheme and host, return the URL without a trailing slash
pub fn validate_url(url: &str) -> ClientResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let invalid = |reason: &str| ClientError::InvalidUrl {
        url: url.to_owned(),
        reason: reason.to_owned(),
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(trimmed.to_owned())
}

/// REST client for the price forecast service, bound to one region
#[derive(Debug, Clone)]
pub struct ForecastClient {
    base_url: String,
    region_id: String,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    historical_hours: u32,
}

impl ForecastClient {
    pub fn new(base_url: &str, region_id: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, region_id, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        region_id: impl Into<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = validate_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            region_id: region_id.into(),
            client,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            historical_hours: DEFAULT_HISTORICAL_HOURS,
        })
    }

    /// Set custom retry configuration
    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_historical_hours(mut self, hours: u32) -> Self {
        self.historical_hours = hours;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn region(&self) -> &str {
        &self.region_id
    }

    /// Latest observed price: last entry of the one-hour historical query
    pub async fn get_current_price(&self) -> ClientResult<Option<CurrentPrice>> {
        let response = self.get_historical_response(1).await?;
        let current = response.historical_data.last().copied().map(CurrentPrice::from);

        match &current {
            Some(c) => debug!("✅ [API RESULT] {} current price {:.2}", self.region_id, c.price),
            None => warn!("⚠️ [API] {} has no current price", self.region_id),
        }
        Ok(current)
    }

    pub async fn get_predictions(&self, horizon: Horizon) -> ClientResult<Vec<PricePoint>> {
        let url = format!(
            "{}/api/predictions/{}/{}",
            self.base_url,
            self.region_id,
            horizon.path_segment()
        );
        let points: Vec<PricePoint> = self.get_json(&url, &[]).await?;
        debug!(
            "✅ [API RESULT] {} {}: {} points",
            self.region_id,
            horizon,
            points.len()
        );
        Ok(points)
    }

    pub async fn get_historical(&self, hours: u32) -> ClientResult<Vec<PricePoint>> {
        let response = self.get_historical_response(hours).await?;
        Ok(response
            .historical_data
            .into_iter()
            .map(PricePoint::from)
            .collect())
    }

    /// True when `/health` answers 200
    pub async fn health(&self) -> ClientResult<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.retry_request(|| self.client.get(&url).send()).await?;
        let healthy = response.status() == StatusCode::OK;
        if !healthy {
            warn!("Health check failed: status {}", response.status());
        }
        Ok(healthy)
    }

    /// Probe the service the way a fresh setup would.
    ///
    /// Requires a healthy service and a non-empty 24h forecast for the region.
    /// Returns the display title for the configured region.
    pub async fn validate(&self) -> ClientResult<String> {
        info!(
            "🔍 [API] Validating {} for region {}",
            self.base_url, self.region_id
        );

        if !self.health().await? {
            return Err(ClientError::Validation(format!(
                "health check at {} did not return 200",
                self.base_url
            )));
        }

        let predictions = self.get_predictions(Horizon::Next24h).await?;
        if predictions.is_empty() {
            return Err(ClientError::Validation(format!(
                "no 24h predictions available for region {}",
                self.region_id
            )));
        }

        Ok(format!("Electricity Forecast ({})", self.region_id))
    }

    async fn get_historical_response(&self, hours: u32) -> ClientResult<HistoricalResponse> {
        let url = format!(
            "{}/api/historical/{}/combined",
            self.base_url, self.region_id
        );
        self.get_json(&url, &[("hours", hours.to_string())]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        debug!("🔍 [API QUERY] GET {}", url);

        let response = self
            .retry_request(|| self.client.get(url).query(query).send())
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<T>().await?),
            StatusCode::NOT_FOUND => {
                error!("❌ [API ERROR] Region not found: {}", self.region_id);
                Err(ClientError::RegionNotFound(self.region_id.clone()))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("❌ [API ERROR] Status {}: {}", status, error_text);
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> ClientResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Request failed after {} attempts: {}", attempts, e);
                    return Err(ClientError::Http(e));
                }
                Err(e) => {
                    warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    fn region_id(&self) -> &str {
        &self.region_id
    }

    async fn current_price(&self) -> anyhow::Result<Option<CurrentPrice>> {
        Ok(self.get_current_price().await?)
    }

    async fn predictions(&self, horizon: Horizon) -> anyhow::Result<Vec<PricePoint>> {
        Ok(self.get_predictions(horizon).await?)
    }

    async fn historical(&self, hours: u32) -> anyhow::Result<Vec<PricePoint>> {
        Ok(self.get_historical(hours).await?)
    }

    fn historical_hours(&self) -> u32 {
        self.historical_hours
    }
}
