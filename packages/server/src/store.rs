//! In-memory region registry and prediction history.
//!
//! Regions are created on first reference with placeholder metadata.
//! Predictions are kept per region in insertion order, capped at
//! [`MAX_HISTORY_PER_REGION`] entries.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use climate_risk_models::{PredictionResult, Region};

/// Oldest predictions beyond this count are dropped.
pub const MAX_HISTORY_PER_REGION: usize = 1000;

#[derive(Debug, Default)]
struct StoreInner {
    regions: BTreeMap<String, Region>,
    predictions: BTreeMap<String, Vec<PredictionResult>>,
}

/// Shared store for regions and their predictions.
#[derive(Debug, Default)]
pub struct PredictionStore {
    inner: Mutex<StoreInner>,
}

impl PredictionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the region called `name`, creating a placeholder if it
    /// hasn't been seen before.
    pub fn get_or_create_region(&self, name: &str) -> Region {
        self.lock()
            .regions
            .entry(name.to_string())
            .or_insert_with(|| {
                log::info!("Registering new region '{name}'");
                Region::placeholder(name)
            })
            .clone()
    }

    /// Appends a prediction to its region's history.
    pub fn record(&self, result: PredictionResult) {
        let mut inner = self.lock();
        let history = inner.predictions.entry(result.region.clone()).or_default();
        history.push(result);
        if history.len() > MAX_HISTORY_PER_REGION {
            let excess = history.len() - MAX_HISTORY_PER_REGION;
            history.drain(..excess);
        }
    }

    /// Returns up to `limit` predictions for `region`, newest first, or
    /// `None` if the region is unknown.
    pub fn history(&self, region: &str, limit: usize) -> Option<Vec<PredictionResult>> {
        let inner = self.lock();
        inner.regions.get(region)?;
        Some(
            inner
                .predictions
                .get(region)
                .map(|history| history.iter().rev().take(limit).cloned().collect())
                .unwrap_or_default(),
        )
    }
}
