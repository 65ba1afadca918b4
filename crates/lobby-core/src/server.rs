//! Server records as stored by the registry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network endpoint identifying one game server instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Endpoint {
    pub ip: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// A live game server, as last announced.
///
/// Only `ip`, `port` and `updated_at` mean anything to the registry. The
/// rest is carried through untouched and handed back to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Network-observed address of the registering server.
    pub ip: String,
    /// Game port the server accepts players on.
    pub port: u16,
    pub name: String,
    pub map: String,
    pub max_players: u16,
    pub players: Vec<String>,
    /// Unix timestamp (seconds) of the most recent registration.
    pub updated_at: i64,
}

impl ServerEntry {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.ip.clone(), self.port)
    }
}
