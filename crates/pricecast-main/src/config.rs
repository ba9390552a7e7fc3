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

use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use pricecast_types::{DEFAULT_API_URL, DEFAULT_REGION_ID, is_known_region};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Shortest refresh interval accepted, protects the forecast service
pub const MIN_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCastConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub web: WebSettings,
    /// Currency label used in units, prices are not converted
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_historical_hours")]
    pub historical_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSettings {
    #[serde(default = "default_web_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSettings {
    pub id: String,
    /// IANA name, decides where "today" ends for this region
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_historical_hours() -> u32 {
    168
}

fn default_interval_secs() -> u64 {
    600
}

fn default_web_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8099
}

fn default_currency() -> String {
    "EUR".to_owned()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_owned()
}

fn default_regions() -> Vec<RegionSettings> {
    vec![RegionSettings {
        id: DEFAULT_REGION_ID.to_owned(),
        timezone: default_timezone(),
    }]
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            historical_hours: default_historical_hours(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            enabled: default_web_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for PriceCastConfig {
    fn default() -> Self {
        Self {
            source: SourceSettings::default(),
            refresh: RefreshSettings::default(),
            web: WebSettings::default(),
            currency: default_currency(),
            regions: default_regions(),
        }
    }
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl RegionSettings {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}' for region {}: {e}", self.timezone, self.id))
    }
}

impl PriceCastConfig {
    /// Load from `path`, or from `config.toml` when present, or fall back to defaults.
    ///
    /// Environment overrides are applied before validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                warn!("No configuration file found, using defaults with environment overrides");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML: {}", path.display()))?;
        info!("✅ Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `PRICECAST_*` overrides; `lookup` is `std::env::var` outside tests
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PRICECAST_API_URL") {
            self.source.api_url = url;
        }

        if let Some(raw) = lookup("PRICECAST_REFRESH_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.refresh.interval_secs = secs,
                Err(_) => warn!("Ignoring invalid PRICECAST_REFRESH_SECS: {raw}"),
            }
        }

        if let Some(raw) = lookup("PRICECAST_PORT") {
            match raw.parse::<u16>() {
                Ok(port) => self.web.port = port,
                Err(_) => warn!("Ignoring invalid PRICECAST_PORT: {raw}"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        pricecast_client::validate_url(&self.source.api_url)
            .context("source.api_url is not a valid http(s) URL")?;

        if self.source.max_retries == 0 {
            bail!("source.max_retries must be at least 1");
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be greater than 0");
        }
        if self.refresh.interval_secs < MIN_REFRESH_SECS {
            bail!(
                "refresh.interval_secs must be at least {MIN_REFRESH_SECS}, got {}",
                self.refresh.interval_secs
            );
        }
        if self.currency.trim().is_empty() {
            bail!("currency cannot be empty");
        }
        if self.regions.is_empty() {
            bail!("Configuration must include at least one region");
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !is_known_region(&region.id) {
                bail!("Unknown region id '{}'", region.id);
            }
            if !seen.insert(region.id.as_str()) {
                bail!("Region '{}' is configured more than once", region.id);
            }
            region.tz()?;
        }

        Ok(())
    }

    pub fn region(&self, id: &str) -> Option<&RegionSettings> {
        self.regions.iter().find(|r| r.id == id)
    }
}
