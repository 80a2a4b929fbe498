//! The order ledger.

use rowkeeper_dom::{Document, NodeId};
use tracing::{debug, warn};

/// Attribute carrying a row's position at first observation.
pub const ORIGIN_ATTR: &str = "data-rk-origin";

/// Remembers the pristine (host-given) order of rows at first observation.
///
/// Tags are written onto the row elements themselves, so a tag survives
/// exactly as long as the host keeps the element alive — a recreated row is
/// deliberately untagged until the next [`OrderLedger::ensure_tagged`]. Tags
/// from one container are meaningless in another: when the watched container
/// instance changes, all prior tags are cleared and numbering restarts from
/// the new container's current order.
#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    container: Option<NodeId>,
    next_tag: u32,
}

impl OrderLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The container instance the current tags belong to.
    #[must_use]
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// True when no row has been tagged since the last invalidation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next_tag == 0
    }

    /// Tags every untagged row with the next sequential position, in the
    /// given (current) order. Existing tags are never overwritten. If
    /// `container` differs from the instance previously tagged, all prior
    /// tags are cleared first and numbering restarts.
    pub fn ensure_tagged(&mut self, doc: &mut Document, container: NodeId, rows: &[NodeId]) {
        if self.container != Some(container) {
            if self.container.is_some() {
                debug!(%container, "container instance changed; retagging from current order");
            }
            for &row in rows {
                doc.remove_attr(row, ORIGIN_ATTR);
            }
            self.container = Some(container);
            self.next_tag = 0;
        }
        for &row in rows {
            if doc.attr(row, ORIGIN_ATTR).is_none() {
                doc.set_attr(row, ORIGIN_ATTR, self.next_tag.to_string());
                self.next_tag += 1;
            }
        }
    }

    /// The row's position at first observation, or `None` for a row never
    /// tagged (it did not exist when the ledger was built).
    #[must_use]
    pub fn original_index_of(&self, doc: &Document, row: NodeId) -> Option<u32> {
        let raw = doc.attr(row, ORIGIN_ATTR)?;
        match raw.parse() {
            Ok(tag) => Some(tag),
            Err(_) => {
                warn!(%row, raw, "unparseable origin tag; treating row as untagged");
                None
            }
        }
    }

    /// Forgets the watched container and all numbering. The next
    /// `ensure_tagged` rebuilds from scratch.
    pub fn invalidate(&mut self) {
        self.container = None;
        self.next_tag = 0;
    }
}
