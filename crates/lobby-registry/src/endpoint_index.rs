//! Endpoint index — one current entry per (ip, port).

use std::collections::HashMap;

use lobby_core::{Endpoint, ServerEntry};
use parking_lot::Mutex;

/// Map from endpoint to its current entry, behind a single lock.
#[derive(Default)]
pub struct EndpointIndex {
    entries: Mutex<HashMap<Endpoint, ServerEntry>>,
}

impl EndpointIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, endpoint: &Endpoint) -> Option<ServerEntry> {
        self.entries.lock().get(endpoint).cloned()
    }

    /// Insert or overwrite.
    pub fn set(&self, endpoint: Endpoint, entry: ServerEntry) {
        self.entries.lock().insert(endpoint, entry);
    }

    pub fn delete(&self, endpoint: &Endpoint) {
        self.entries.lock().remove(endpoint);
    }

    /// Remove the entry only if it still carries `updated_at`.
    ///
    /// Returns true if something was removed.
    pub fn delete_if_stamped(&self, endpoint: &Endpoint, updated_at: i64) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(endpoint) {
            Some(entry) if entry.updated_at == updated_at => {
                entries.remove(endpoint);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
