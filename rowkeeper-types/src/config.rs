//! Reconciler tuning configuration.
//!
//! Every value here was tuned empirically against observed host repaint
//! behavior. They are configuration, not semantics: a different host may need
//! different numbers, and nothing in the state machines depends on the
//! specific defaults.

use serde::{Deserialize, Serialize};

/// Tuning for one reconciler instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Debounce delay applied to the first mutation after a quiet period (ms).
    pub debounce_base_ms: u64,
    /// Upper bound the adaptive debounce delay may grow to (ms).
    pub debounce_ceiling_ms: u64,
    /// Mutations closer together than this count as a burst and escalate the
    /// debounce delay (ms).
    pub burst_window_ms: u64,
    /// Quiet time after which the debounce delay decays back to base (ms).
    pub quiet_after_ms: u64,
    /// Interval of the periodic order-correctness sweep (ms).
    pub sweep_interval_ms: u64,
    /// Delay between the engine's own writes and releasing the suppression
    /// flag, so the host's batched change notifications drain first (ms).
    pub settle_delay_ms: u64,
    /// Validity window of the cached container handle (ms).
    pub container_cache_ms: u64,
    /// Interval of the container identity poll (ms).
    pub watch_poll_ms: u64,
    /// Boot-time discovery retry budget.
    pub discovery: DiscoveryConfig,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            debounce_base_ms: 250,
            debounce_ceiling_ms: 2_000,
            burst_window_ms: 500,
            quiet_after_ms: 3_000,
            sweep_interval_ms: 3_000,
            settle_delay_ms: 120,
            container_cache_ms: 1_000,
            watch_poll_ms: 800,
            discovery: DiscoveryConfig::default(),
        }
    }
}

/// Bounded retry-with-backoff budget for boot-time container discovery.
///
/// After the budget is exhausted the feature degrades to inert (the identity
/// poll keeps looking) rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Maximum discovery attempts before degrading to inert.
    pub max_attempts: usize,
    /// Delay before the first retry (ms).
    pub initial_delay_ms: u64,
    /// Ceiling on the backoff delay (ms).
    pub max_delay_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            initial_delay_ms: 500,
            max_delay_ms: 5_000,
        }
    }
}
