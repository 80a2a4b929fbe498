//! Error types for the reconcile layer.

use thiserror::Error;

/// Result type for reconcile operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that can occur talking to a running driver.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The driver task has shut down.
    #[error("driver channel closed")]
    ChannelClosed,
}
