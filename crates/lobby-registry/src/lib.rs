//! lobby-registry — the in-memory server registry.
//!
//! Two indexes over the same set of live servers: one by endpoint for point
//! lookups, one by last-update time for ordered listing and expiry.

pub mod clock;
pub mod endpoint_index;
pub mod registry;
pub mod timeline;

pub use clock::{Clock, ManualClock, SystemClock};
pub use endpoint_index::EndpointIndex;
pub use registry::{new_registry, Registry, SharedRegistry, Upsert};
pub use timeline::{TimelineGuard, TimelineIndex};
