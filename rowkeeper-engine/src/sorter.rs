//! The sort/reset engine.

use crate::ledger::OrderLedger;
use crate::partition::{LabelFilter, PartitionOutcome};
use rowkeeper_dom::{Document, NodeId};
use rowkeeper_keys::{compare_keys, KeySource};
use rowkeeper_locate::RowLocator;
use rowkeeper_types::{Millis, SortDirection};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Result of a sort pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOutcome {
    /// Rows were reordered (possibly into the order they already had).
    Applied { rows: usize },
    /// No container or no rows yet; nothing was touched.
    NoList,
}

/// Result of a reset pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetOutcome {
    /// Tagged rows were restored to their pristine order.
    Restored { rows: usize },
    /// Rows exist but none carry a ledger tag — reset before any sort.
    NothingTagged,
    /// No container or no rows yet; nothing was touched.
    NoList,
}

/// Applies a requested ordering to the live container.
///
/// One sorter per reconciler instance. Rows are re-fetched from the locator
/// on every call — handles are never trusted across a suspension point.
/// Callers are responsible for bracketing each call in the reconciler's
/// suppression window so the engine's own writes are not mistaken for host
/// changes.
#[derive(Debug)]
pub struct RowSorter {
    locator: RowLocator,
    key_source: KeySource,
    ledger: OrderLedger,
}

impl RowSorter {
    /// Builds a sorter from a locator and a key source.
    #[must_use]
    pub fn new(locator: RowLocator, key_source: KeySource) -> Self {
        Self {
            locator,
            key_source,
            ledger: OrderLedger::new(),
        }
    }

    /// Default locator rules and title-based keys.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RowLocator::with_defaults(), KeySource::title())
    }

    /// The ledger (diagnostics and tests).
    #[must_use]
    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    /// Access to the locator, e.g. to invalidate its container cache.
    pub fn locator_mut(&mut self) -> &mut RowLocator {
        &mut self.locator
    }

    /// Sorts the visible rows by comparison key.
    ///
    /// Stable: rows with equal keys keep their relative order. Rows are
    /// reinserted as the same live nodes (move-in-place); the pass is
    /// idempotent and depends only on present document state.
    pub fn sort(
        &mut self,
        doc: &mut Document,
        direction: SortDirection,
        now: Millis,
    ) -> SortOutcome {
        let Some(located) = self.locator.locate(doc, now) else {
            return SortOutcome::NoList;
        };
        if located.rows.is_empty() {
            return SortOutcome::NoList;
        }

        self.ledger
            .ensure_tagged(doc, located.container, &located.rows);

        let mut keyed: Vec<(String, NodeId)> = located
            .rows
            .iter()
            .map(|&row| (self.key_source.sort_key(doc, row), row))
            .collect();
        keyed.sort_by(|a, b| directed_compare(&a.0, &b.0, direction));

        for &(_, row) in &keyed {
            doc.append_child(located.container, row);
        }
        debug!(rows = keyed.len(), %direction, "sort applied");
        SortOutcome::Applied { rows: keyed.len() }
    }

    /// Restores the pristine order recorded by the ledger.
    ///
    /// Rows without a tag have no known original position; they keep their
    /// relative order and end up after the tagged rows. Zero tagged rows is
    /// reported distinctly — it usually means the user reset before ever
    /// sorting — and mutates nothing.
    pub fn reset(&mut self, doc: &mut Document, now: Millis) -> ResetOutcome {
        let Some(located) = self.locator.locate(doc, now) else {
            return ResetOutcome::NoList;
        };
        if located.rows.is_empty() {
            return ResetOutcome::NoList;
        }

        let tagged = located
            .rows
            .iter()
            .filter(|&&row| self.ledger.original_index_of(doc, row).is_some())
            .count();
        if tagged == 0 {
            debug!("reset requested with an empty ledger; nothing to restore");
            return ResetOutcome::NothingTagged;
        }

        let mut keyed: Vec<(u32, NodeId)> = located
            .rows
            .iter()
            .map(|&row| {
                let tag = self
                    .ledger
                    .original_index_of(doc, row)
                    .unwrap_or(u32::MAX);
                (tag, row)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        for &(_, row) in &keyed {
            doc.append_child(located.container, row);
        }
        debug!(rows = tagged, "original order restored");
        ResetOutcome::Restored { rows: tagged }
    }

    /// Applies a visibility partition over the current row set, including
    /// rows the partition itself hid earlier. A missing list is a no-op.
    pub fn apply_filter(
        &mut self,
        doc: &mut Document,
        filter: &LabelFilter,
        now: Millis,
    ) -> PartitionOutcome {
        let Some(container) = self.locator.locate_container(doc, now) else {
            return PartitionOutcome::default();
        };
        let rows = self.locator.locate_rows_including_hidden(doc, container);
        filter.apply(doc, &rows)
    }

    /// True when the visible rows already satisfy `direction` (or there is
    /// nothing to check). The reconciler's sweep uses this to stay
    /// idempotent: a re-sort is only forced when this returns false.
    pub fn is_ordered(&mut self, doc: &Document, direction: SortDirection, now: Millis) -> bool {
        let Some(located) = self.locator.locate(doc, now) else {
            return true;
        };
        let keys: Vec<String> = located
            .rows
            .iter()
            .map(|&row| self.key_source.sort_key(doc, row))
            .collect();
        keys.windows(2)
            .all(|pair| directed_compare(&pair[0], &pair[1], direction) != Ordering::Greater)
    }
}

impl Default for RowSorter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Key comparison under a direction. Empty keys (rows whose markup no source
/// understood) order after all non-empty keys in *both* directions, so
/// unknown rows collect at the bottom instead of flipping ends.
fn directed_compare(a: &str, b: &str, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_keys(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}
