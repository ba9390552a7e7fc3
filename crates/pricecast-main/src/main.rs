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

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use pricecast_core::RefreshOutcome;
use pricecast_core::signals::{mwh_to_kwh, round_mwh};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

use pricecast_main::web::{self, WebState};
use pricecast_main::{PriceCastConfig, RegionRuntime};

#[derive(Parser)]
#[command(
    name = "pricecast",
    version,
    about = "Electricity price forecast signals for automation",
    long_about = "Fetches 24h and 7-day electricity price forecasts and derives cheap/expensive\n\
    signals, rankings, trends and day comparisons for each configured region.\n\
    \nExamples:\n  \
    pricecast run                          # Refresh every region and serve signals\n  \
    pricecast once --region DE-BY          # Print the signals of one region\n  \
    pricecast cheapest --hours 3           # Cheapest hours left today"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "PRICECAST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh all regions periodically and serve signals over HTTP
    Run,

    /// Fetch once and print the signals as JSON
    Once {
        /// Region id (defaults to the first configured region)
        #[arg(long)]
        region: Option<String>,
    },

    /// Print the cheapest hours remaining today
    Cheapest {
        #[arg(long, default_value_t = 3)]
        hours: usize,
        #[arg(long)]
        region: Option<String>,
    },

    /// Print the most expensive hours remaining today
    Expensive {
        #[arg(long, default_value_t = 3)]
        hours: usize,
        #[arg(long)]
        region: Option<String>,
    },

    /// Validate the configuration and probe the forecast API
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let config = PriceCastConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Once { region } => once(&config, region.as_deref()).await,
        Commands::Cheapest { hours, region } => {
            print_hours(&config, region.as_deref(), hours, HourOrder::Cheapest).await
        }
        Commands::Expensive { hours, region } => {
            print_hours(&config, region.as_deref(), hours, HourOrder::MostExpensive).await
        }
        Commands::Validate => validate(&config).await,
    }
}

async fn run(config: PriceCastConfig) -> Result<()> {
    info!("🚀 Starting PriceCast");
    info!("📋 Configuration Summary:");
    info!("   API: {}", config.source.api_url);
    info!("   Refresh: every {}s", config.refresh.interval_secs);
    for region in &config.regions {
        info!("     - {} ({})", region.id, region.timezone);
    }

    let regions = RegionRuntime::all(&config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let tasks: Vec<_> = regions
        .iter()
        .map(|r| Arc::clone(&r.scheduler).spawn(shutdown_rx.clone()))
        .collect();

    if config.web.enabled {
        let state = WebState::new(regions.clone());
        let bind_address = config.web.bind_address.clone();
        let port = config.web.port;
        tokio::spawn(async move {
            if let Err(e) = web::serve(state, &bind_address, port).await {
                error!("❌ Web server failed: {e:#}");
            }
        });
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    shutdown_tx.send(true).ok();
    for task in tasks {
        if let Err(e) = task.await {
            warn!("Scheduler task ended abnormally: {e}");
        }
    }

    info!("Shutting down");
    Ok(())
}

fn select_region(config: &PriceCastConfig, id: Option<&str>) -> Result<RegionRuntime> {
    let settings = match id {
        Some(id) => config
            .region(id)
            .with_context(|| format!("Region '{id}' is not configured"))?,
        None => config
            .regions
            .first()
            .context("Configuration has no regions")?,
    };
    RegionRuntime::new(config, settings)
}

async fn refresh_once(region: &RegionRuntime) -> Result<()> {
    match region.scheduler.refresh_now().await {
        RefreshOutcome::Committed { .. } => Ok(()),
        RefreshOutcome::Failed { error } => bail!("Refresh of {} failed: {error}", region.id),
        RefreshOutcome::AlreadyInFlight => bail!("Refresh of {} already running", region.id),
    }
}

async fn once(config: &PriceCastConfig, region: Option<&str>) -> Result<()> {
    let region = select_region(config, region)?;
    refresh_once(&region).await?;

    let set = region
        .signal_set(Utc::now())
        .context("No snapshot after refresh")?;
    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum HourOrder {
    Cheapest,
    MostExpensive,
}

async fn print_hours(
    config: &PriceCastConfig,
    region: Option<&str>,
    hours: usize,
    order: HourOrder,
) -> Result<()> {
    let region = select_region(config, region)?;
    refresh_once(&region).await?;

    let snapshot = region.store.current().context("No snapshot after refresh")?;
    let now = Utc::now();
    let points = match order {
        HourOrder::Cheapest => region.engine.cheapest_hours(&snapshot, now, hours),
        HourOrder::MostExpensive => region.engine.most_expensive_hours(&snapshot, now, hours),
    };

    if points.is_empty() {
        println!("No forecast hours left today for {}", region.id);
        return Ok(());
    }

    let tz = region.engine.timezone();
    println!("{} ({})", region.name, region.id);
    for point in points {
        println!(
            "  {}  {:>9.5} {}/kWh  ({:.2} {}/MWh)",
            point.timestamp.with_timezone(&tz).format("%a %H:%M"),
            mwh_to_kwh(point.predicted_price),
            config.currency,
            round_mwh(point.predicted_price),
            config.currency,
        );
    }
    Ok(())
}

async fn validate(config: &PriceCastConfig) -> Result<()> {
    info!("✅ Configuration is valid");

    let mut failures = 0_usize;
    for region in RegionRuntime::all(config)? {
        match region.client.validate().await {
            Ok(title) => info!("✅ {title}: API reachable at {}", region.client.base_url()),
            Err(e) => {
                error!("❌ {}: {e}", region.id);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} region(s) failed API validation");
    }
    Ok(())
}
