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
use parking_lot::RwLock;
use pricecast_types::Snapshot;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<Arc<Snapshot>>,
    committed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
    consecutive_failures: u32,
}

/// Freshness of the data held by a [`SnapshotStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub has_data: bool,
    pub committed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl StoreStatus {
    /// Stale once the latest refresh failed, or before the first success
    pub fn is_stale(&self) -> bool {
        !self.has_data || self.consecutive_failures > 0
    }
}

/// Latest good snapshot of one region.
///
/// Readers clone the `Arc` and release the lock immediately; a commit is a
/// pointer swap.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.state.read().snapshot.clone()
    }

    /// Replace the snapshot and clear any recorded failure
    pub fn commit(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write();
        state.committed_at = Some(snapshot.fetched_at);
        state.snapshot = Some(Arc::clone(&snapshot));
        state.last_error = None;
        state.consecutive_failures = 0;
        snapshot
    }

    /// Keep the previous snapshot, mark the data stale
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut state = self.state.write();
        state.last_error = Some(error.into());
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
    }

    pub fn status(&self) -> StoreStatus {
        let state = self.state.read();
        StoreStatus {
            has_data: state.snapshot.is_some(),
            committed_at: state.committed_at,
            last_error: state.last_error.clone(),
            consecutive_failures: state.consecutive_failures,
        }
    }
}
