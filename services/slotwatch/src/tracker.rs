//! Slot availability tracking against the registration backend

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::watch;

use crate::io::HttpClient;
use crate::state::{SlotState, SlotsHandle};

/// Team count payload served by `GET <base>/teams/count`.
///
/// Older backend revisions served a bare integer body; the object shape is
/// the agreed contract and the only one accepted here.
#[derive(Debug, Deserialize)]
struct TeamCountResponse {
    total: i64,
}

/// Cached remaining-slot count, refreshed on demand from the backend.
///
/// One instance is shared between all consumers. Overlapping refreshes are
/// coalesced into a single request, and a failed fetch keeps the last good
/// value so the views never regress to an empty display.
pub struct SlotTracker {
    count_url: String,
    capacity: i64,
    http: Arc<dyn HttpClient>,
    slots: SlotsHandle,
}

impl std::fmt::Debug for SlotTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotTracker")
            .field("count_url", &self.count_url)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl SlotTracker {
    pub fn new(base_url: &str, capacity: i64, http: Arc<dyn HttpClient>) -> Self {
        let count_url = format!("{}/teams/count", base_url.trim_end_matches('/'));
        tracing::debug!(
            "Created SlotTracker for {} (capacity {})",
            count_url,
            capacity
        );

        Self {
            count_url,
            capacity,
            http,
            slots: SlotsHandle::new(),
        }
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Current state without triggering a fetch
    pub fn snapshot(&self) -> SlotState {
        self.slots.snapshot()
    }

    /// Receiver notified on every state mutation
    pub fn subscribe(&self) -> watch::Receiver<SlotState> {
        self.slots.subscribe()
    }

    /// Refresh the cached slot count from the backend.
    ///
    /// Returns immediately when a fetch is already in flight, or when a
    /// value is cached and `force` is not set. Callers never see a fetch
    /// error; failures are logged and the previous value stays in place.
    pub async fn refresh(&self, force: bool) {
        if !self.slots.try_begin_fetch(force) {
            tracing::debug!("Refresh skipped (in flight or cached)");
            return;
        }

        match self.fetch_team_count().await {
            Ok(count) => {
                let slots_left = self.capacity - count;
                tracing::debug!("Team count {} -> {} slots left", count, slots_left);
                self.slots.finish_fetch(Some(slots_left));
            }
            Err(e) => {
                tracing::warn!("Failed to fetch team count: {}", e);
                self.slots.finish_fetch(None);
            }
        }
    }

    async fn fetch_team_count(&self) -> crate::Result<i64> {
        let response = self.http.get(&self.count_url).await?;
        if !(200..300).contains(&response.status) {
            return Err(crate::SlotwatchError::Http(format!(
                "GET {} -> {}",
                self.count_url, response.status
            )));
        }

        let parsed: TeamCountResponse = serde_json::from_str(&response.body)?;
        Ok(parsed.total)
    }
}
