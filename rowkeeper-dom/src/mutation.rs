//! Structural-change records.

use crate::document::NodeId;
use serde::{Deserialize, Serialize};

/// One child-list change observed on a parent node.
///
/// Deliberately coarse: the reconciler only needs to know *that* a parent's
/// child list changed, not what changed — it always re-fetches current rows
/// rather than reasoning about the history of changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// The node whose child list changed.
    pub parent: NodeId,
}
