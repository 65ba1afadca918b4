//! Timeline index — entries bucketed by last-update timestamp.
//!
//! Buckets are keyed by `updated_at` and iterate oldest first. Order inside a
//! bucket carries no meaning; removal swaps with the last element. A bucket
//! never stays empty: the operation that empties it also deletes it.

use std::collections::BTreeMap;

use lobby_core::{Endpoint, ServerEntry};
use parking_lot::{Mutex, MutexGuard};

type Buckets = BTreeMap<i64, Vec<ServerEntry>>;

#[derive(Default)]
pub struct TimelineIndex {
    buckets: Mutex<Buckets>,
}

impl TimelineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, updated_at: i64) -> Option<Vec<ServerEntry>> {
        self.buckets.lock().get(&updated_at).cloned()
    }

    /// Replace the bucket at `updated_at`. An empty bucket deletes the key.
    pub fn set(&self, updated_at: i64, bucket: Vec<ServerEntry>) {
        let mut buckets = self.buckets.lock();
        if bucket.is_empty() {
            buckets.remove(&updated_at);
        } else {
            buckets.insert(updated_at, bucket);
        }
    }

    pub fn delete(&self, updated_at: i64) {
        self.buckets.lock().remove(&updated_at);
    }

    /// Add `entry` to the bucket for its own `updated_at`.
    pub fn append(&self, entry: ServerEntry) {
        let mut buckets = self.buckets.lock();
        push(&mut buckets, entry);
    }

    /// Remove the entry for `endpoint` from the bucket at `updated_at`.
    pub fn remove(&self, updated_at: i64, endpoint: &Endpoint) -> Option<ServerEntry> {
        let mut buckets = self.buckets.lock();
        take(&mut buckets, updated_at, endpoint)
    }

    /// Move `endpoint` out of the bucket at `old_updated_at` and add `entry`
    /// under its new timestamp, in one critical section.
    ///
    /// Returns the entry that was removed, if it was found.
    pub fn replace(
        &self,
        old_updated_at: i64,
        endpoint: &Endpoint,
        entry: ServerEntry,
    ) -> Option<ServerEntry> {
        let mut buckets = self.buckets.lock();
        let previous = take(&mut buckets, old_updated_at, endpoint);
        push(&mut buckets, entry);
        previous
    }

    /// Smallest timestamp currently held.
    pub fn oldest(&self) -> Option<i64> {
        self.buckets.lock().keys().next().copied()
    }

    /// Lock the index for ordered iteration. The lock is held until the
    /// guard drops.
    pub fn lock(&self) -> TimelineGuard<'_> {
        TimelineGuard {
            buckets: self.buckets.lock(),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.lock().values().map(Vec::len).sum()
    }
}

/// Exclusive view of the timeline, for scans that must see one consistent
/// state from start to finish.
pub struct TimelineGuard<'a> {
    buckets: MutexGuard<'a, Buckets>,
}

impl TimelineGuard<'_> {
    /// Buckets in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[ServerEntry])> + '_ {
        self.buckets.iter().map(|(ts, bucket)| (*ts, bucket.as_slice()))
    }

    pub fn delete(&mut self, updated_at: i64) -> Option<Vec<ServerEntry>> {
        self.buckets.remove(&updated_at)
    }
}

fn push(buckets: &mut Buckets, entry: ServerEntry) {
    buckets.entry(entry.updated_at).or_default().push(entry);
}

fn take(buckets: &mut Buckets, updated_at: i64, endpoint: &Endpoint) -> Option<ServerEntry> {
    let bucket = buckets.get_mut(&updated_at)?;
    let pos = bucket
        .iter()
        .position(|e| e.ip == endpoint.ip && e.port == endpoint.port)?;
    let removed = bucket.swap_remove(pos);
    if bucket.is_empty() {
        buckets.remove(&updated_at);
    }
    Some(removed)
}
