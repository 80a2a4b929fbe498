//! Monotonic millisecond clock values.
//!
//! The reconciler is a pure state machine: it never reads ambient time.
//! Callers sample their clock (the driver uses the runtime's instant source)
//! and pass readings in as `Millis` values measured from an arbitrary
//! per-process origin. Only differences and orderings are meaningful.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Add;

/// A monotonic clock reading in milliseconds since an arbitrary origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(u64);

impl Millis {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Creates a reading from a raw millisecond count.
    #[must_use]
    pub const fn from_raw(ms: u64) -> Self {
        Self(ms)
    }

    /// Returns the raw millisecond count.
    #[must_use]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns this reading advanced by `ms` milliseconds.
    #[must_use]
    pub const fn plus(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero if the
    /// readings arrive out of order.
    #[must_use]
    pub const fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for Millis {
    type Output = Self;

    fn add(self, ms: u64) -> Self {
        self.plus(ms)
    }
}

impl PartialOrd for Millis {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Millis {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
