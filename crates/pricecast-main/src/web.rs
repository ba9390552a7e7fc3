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

//! JSON endpoint serving the signals of every configured region.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::runtime::RegionRuntime;

#[derive(Debug, Clone)]
pub struct WebState {
    pub regions: Arc<Vec<Arc<RegionRuntime>>>,
}

impl WebState {
    pub fn new(regions: Vec<Arc<RegionRuntime>>) -> Self {
        Self {
            regions: Arc::new(regions),
        }
    }

    fn region(&self, id: &str) -> Option<&Arc<RegionRuntime>> {
        self.regions.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Serialize)]
pub struct RegionSummary {
    pub id: String,
    pub name: &'static str,
    pub timezone: String,
    pub has_data: bool,
    pub stale: bool,
    pub committed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/regions", get(regions_handler))
        .route("/api/regions/{id}/signals", get(signals_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: WebState, bind_address: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 PriceCast signals listening on http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn health_handler(State(state): State<WebState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "regions": state.regions.len(),
    }))
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn regions_handler(State(state): State<WebState>) -> Json<Vec<RegionSummary>> {
    let summaries = state
        .regions
        .iter()
        .map(|r| {
            let status = r.status();
            RegionSummary {
                id: r.id.clone(),
                name: r.name,
                timezone: r.engine.timezone().name().to_owned(),
                has_data: status.has_data,
                stale: status.is_stale(),
                committed_at: status.committed_at,
                last_error: status.last_error,
                consecutive_failures: status.consecutive_failures,
            }
        })
        .collect();

    Json(summaries)
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
async fn signals_handler(State(state): State<WebState>, Path(id): Path<String>) -> Response {
    debug!("📡 [WEB] Signals requested for {}", id);

    let Some(region) = state.region(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Region '{id}' is not configured") })),
        )
            .into_response();
    };

    match region.signal_set(Utc::now()) {
        Some(set) => Json(set).into_response(),
        None => {
            let status = region.status();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "No forecast data available yet",
                    "last_error": status.last_error,
                })),
            )
                .into_response()
        }
    }
}
