//! Inputs to the reconciler state machine.

use rowkeeper_dom::NodeId;
use rowkeeper_types::SortDirection;
use serde::{Deserialize, Serialize};

use crate::command::TimerKind;

/// A user-surface operation. Each is idempotent-safe to invoke repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// Sort now and keep enforcing this direction.
    Sort(SortDirection),
    /// Restore the pristine order and stop enforcing.
    Reset,
    /// Flip auto-enforcement: off when a mode is active, ascending when not.
    ToggleAuto,
}

/// One input to [`Reconciler::handle`](crate::Reconciler::handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A user-surface operation.
    User(UserAction),
    /// A batch of host-driven structural changes under the watched
    /// container. `records` is diagnostic only: multiple underlying changes
    /// may collapse into one batch, and the machine never assumes one
    /// record equals one discrete change.
    Mutations { container: NodeId, records: usize },
    /// A previously armed timer fired.
    Timer(TimerKind),
    /// The page was backgrounded or foregrounded.
    Visibility { foreground: bool },
    /// Result of the periodic container identity poll (or boot discovery).
    ContainerSeen { container: Option<NodeId> },
    /// Result of an ordering check commanded by the sweep.
    OrderChecked { satisfied: bool },
}
