//! Shared per-run cache of probe outcomes

use crate::model::ProbeOutcome;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

type Slot = Arc<OnceCell<Arc<ProbeOutcome>>>;

/// Thread-safe map from URL to its probe outcome.
///
/// Each URL owns a slot that is claimed under the write lock. Whoever claims
/// the slot first runs the probe; concurrent callers for the same URL wait on
/// the slot instead of probing again. Entries are never evicted.
#[derive(Debug, Default)]
pub struct ResultCache {
    slots: RwLock<HashMap<String, Slot>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored outcome for `url`, if its probe has completed.
    pub async fn lookup(&self, url: &str) -> Option<Arc<ProbeOutcome>> {
        let slots = self.slots.read().await;
        slots.get(url).and_then(|slot| slot.get().cloned())
    }

    /// Store an outcome for `url`. A URL that already has an outcome keeps it.
    pub async fn store(&self, url: &str, outcome: ProbeOutcome) -> Arc<ProbeOutcome> {
        let slot = self.claim(url).await;
        let outcome = Arc::new(outcome);

        match slot.set(Arc::clone(&outcome)) {
            Ok(()) => outcome,
            Err(_) => {
                debug!("Outcome for {} already stored, keeping the first one", url);
                slot.get().cloned().unwrap_or(outcome)
            }
        }
    }

    /// Return the outcome for `url`, running `probe` only if no other caller
    /// has produced or is producing it.
    pub async fn get_or_probe<F, Fut>(&self, url: &str, probe: F) -> Arc<ProbeOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProbeOutcome>,
    {
        if let Some(outcome) = self.lookup(url).await {
            debug!("Cache hit for {}", url);
            return outcome;
        }

        let slot = self.claim(url).await;

        slot.get_or_init(|| async move {
            debug!("Cache miss for {}, probing", url);
            Arc::new(probe().await)
        })
        .await
        .clone()
    }

    /// Number of URLs with a completed outcome.
    pub async fn len(&self) -> usize {
        let slots = self.slots.read().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn claim(&self, url: &str) -> Slot {
        {
            let slots = self.slots.read().await;
            if let Some(slot) = slots.get(url) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(url.to_string()).or_default())
    }
}
