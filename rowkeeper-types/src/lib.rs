//! Core type definitions for rowkeeper.
//!
//! This crate defines the fundamental, host-agnostic types used throughout
//! the engine:
//! - Instance identifiers (one per watched list)
//! - Monotonic millisecond clock values
//! - Sort directions and the active enforcement mode
//! - The reconciler tuning configuration
//!
//! Host-specific vocabulary (selector tables, deep-link schemes, action
//! words) belongs in the crates that consume it, not here.

mod clock;
mod config;
mod ids;
mod mode;

pub use clock::Millis;
pub use config::{DiscoveryConfig, ReconcilerConfig};
pub use ids::InstanceId;
pub use mode::{ActiveMode, SortDirection};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),
}
