//! Registry errors.

use crate::server::Endpoint;

/// The only failure the registry reports: no live entry for an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("server not found: {0}")]
    NotFound(Endpoint),
}
