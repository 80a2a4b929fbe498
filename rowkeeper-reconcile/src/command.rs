//! Outputs of the reconciler state machine.

use rowkeeper_dom::NodeId;
use rowkeeper_types::{Millis, SortDirection};
use serde::{Deserialize, Serialize};

/// The reconciler's timers. At most one deadline per kind is armed at a
/// time; arming a kind replaces its pending deadline (coalescing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// The adaptive delay before re-applying the active mode.
    Debounce,
    /// The write-then-settle barrier: fires after the engine's own writes
    /// have drained through the host's change-detection cycle.
    Settle,
    /// The periodic order-correctness sweep.
    Sweep,
}

impl TimerKind {
    /// Number of timer kinds (driver bookkeeping).
    pub const COUNT: usize = 3;

    /// Dense index for per-kind storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Debounce => 0,
            Self::Settle => 1,
            Self::Sweep => 2,
        }
    }
}

/// One instruction for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Start delivering mutation batches for this container.
    Watch(NodeId),
    /// Stop delivering mutation batches for this container.
    Unwatch(NodeId),
    /// Arm (or re-arm, replacing the pending deadline) a timer.
    StartTimer { kind: TimerKind, at: Millis },
    /// Disarm a timer if armed.
    CancelTimer(TimerKind),
    /// Run the sort engine. The machine has already raised suppression.
    ApplySort(SortDirection),
    /// Run the reset engine. The machine has already raised suppression.
    ApplyReset,
    /// Check whether the visible order satisfies the direction and report
    /// back via [`Event::OrderChecked`](crate::Event::OrderChecked).
    CheckOrder(SortDirection),
}
