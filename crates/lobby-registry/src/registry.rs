//! Server registry — upsert by endpoint, ordered listing, lazy expiry.
//!
//! Two indexes, each with its own lock. Mutations (upsert and sweep) are
//! serialized by `write_gate` so concurrent heartbeats for one endpoint can't
//! both append. Readers take only the index lock they need, so a read that
//! lands between the two halves of an upsert may see one index ahead of the
//! other. The next operation sees both.
//!
//! There is no background expiry. Every read sweeps first.

use std::sync::Arc;

use lobby_core::{Endpoint, RegistryError, ServerEntry};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::endpoint_index::EndpointIndex;
use crate::timeline::TimelineIndex;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// First registration for this endpoint.
    Created,
    /// Heartbeat from a known endpoint.
    Refreshed { previous_updated_at: i64 },
}

pub struct Registry {
    endpoints: EndpointIndex,
    timeline: TimelineIndex,
    write_gate: Mutex<()>,
    clock: Arc<dyn Clock>,
    ttl_secs: i64,
}

/// The registry shared across request handlers.
pub type SharedRegistry = Arc<Registry>;

/// Create a new empty shared registry.
pub fn new_registry(ttl_secs: u64, clock: Arc<dyn Clock>) -> SharedRegistry {
    Arc::new(Registry::new(ttl_secs, clock))
}

impl Registry {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            endpoints: EndpointIndex::new(),
            timeline: TimelineIndex::new(),
            write_gate: Mutex::new(()),
            clock,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Current time according to the registry's clock. Callers stamp
    /// `updated_at` with this.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Number of live entries (as of the last sweep).
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Insert a new server or replace the current entry for its endpoint.
    ///
    /// `entry.updated_at` must already be stamped.
    pub fn upsert(&self, entry: ServerEntry) -> Upsert {
        let endpoint = entry.endpoint();
        let _gate = self.write_gate.lock();

        match self.endpoints.get(&endpoint) {
            None => {
                self.timeline.append(entry.clone());
                self.endpoints.set(endpoint.clone(), entry);
                tracing::info!(endpoint = %endpoint, "server registered");
                Upsert::Created
            }
            Some(existing) => {
                let previous_updated_at = existing.updated_at;
                if self
                    .timeline
                    .replace(previous_updated_at, &endpoint, entry.clone())
                    .is_none()
                {
                    tracing::warn!(
                        endpoint = %endpoint,
                        updated_at = previous_updated_at,
                        "previous entry missing from timeline"
                    );
                }
                self.endpoints.set(endpoint.clone(), entry);
                tracing::trace!(endpoint = %endpoint, previous_updated_at, "server refreshed");
                Upsert::Refreshed {
                    previous_updated_at,
                }
            }
        }
    }

    /// Point lookup. Does not sweep.
    pub fn find_by_endpoint(&self, ip: &str, port: u16) -> Result<ServerEntry, RegistryError> {
        let endpoint = Endpoint::new(ip, port);
        self.endpoints
            .get(&endpoint)
            .ok_or(RegistryError::NotFound(endpoint))
    }

    /// Every entry, oldest update first. Ties come out in arbitrary order.
    /// Does not sweep.
    pub fn list_all(&self) -> Vec<ServerEntry> {
        let timeline = self.timeline.lock();
        timeline
            .iter()
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Evict every entry with `now - updated_at > ttl`. Returns how many
    /// entries were removed.
    pub fn sweep_expired(&self, now: i64) -> usize {
        let is_expired = |updated_at: i64| now.saturating_sub(updated_at) > self.ttl_secs;

        // Nothing to do unless the oldest bucket has expired.
        if !self.timeline.oldest().is_some_and(is_expired) {
            return 0;
        }

        let _gate = self.write_gate.lock();
        let mut timeline = self.timeline.lock();

        let mut expired = Vec::new();
        let mut evicted = 0;
        for (updated_at, bucket) in timeline.iter() {
            // Expiry is monotone in the key: the first live bucket ends the scan.
            if !is_expired(updated_at) {
                break;
            }
            for entry in bucket {
                self.endpoints.delete_if_stamped(&entry.endpoint(), updated_at);
                tracing::debug!(endpoint = %entry.endpoint(), updated_at, "server expired");
            }
            evicted += bucket.len();
            expired.push(updated_at);
        }

        for updated_at in expired {
            timeline.delete(updated_at);
        }

        if evicted > 0 {
            tracing::debug!(evicted, now, "expired registry entries");
        }
        evicted
    }

    /// Sweep against the registry clock.
    pub fn sweep(&self) -> usize {
        self.sweep_expired(self.now())
    }

    /// Sweep, then list.
    pub fn list_live(&self) -> Vec<ServerEntry> {
        self.sweep();
        self.list_all()
    }

    /// Sweep, then look up.
    pub fn get_live(&self, ip: &str, port: u16) -> Result<ServerEntry, RegistryError> {
        self.sweep();
        self.find_by_endpoint(ip, port)
    }

    /// Sweep, look up, and return just the player list.
    pub fn players_of(&self, ip: &str, port: u16) -> Result<Vec<String>, RegistryError> {
        self.get_live(ip, port).map(|entry| entry.players)
    }
}
