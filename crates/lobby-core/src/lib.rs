//! lobby-core — shared types, errors and configuration.
//! All other lobby crates depend on this one.

pub mod config;
pub mod error;
pub mod server;

pub use error::RegistryError;
pub use server::{Endpoint, ServerEntry};
