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

pub mod engine;
pub mod metrics;
pub mod refresh;
pub mod signals;
pub mod store;
pub mod traits;

pub use engine::{MetricsEngine, PriceReport, TOP_HOURS};
pub use refresh::{DEFAULT_REFRESH_INTERVAL, RefreshOutcome, RefreshScheduler};
pub use signals::{Signal, SignalContext, SignalKind, SignalSet, project};
pub use store::{SnapshotStore, StoreStatus};
pub use traits::{DEFAULT_HISTORICAL_HOURS, ForecastSource};
