//! The visibility partition.

use rowkeeper_dom::{Document, Matcher, MatcherPath, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Marker class on rows hidden by the partition, so the filter only ever
/// reveals rows it hid itself and never un-hides host-hidden rows.
pub const HIDDEN_CLASS: &str = "rk-label-hidden";

/// Counts from one partition application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionOutcome {
    /// Rows hidden by this pass.
    pub hidden: usize,
    /// Rows revealed by this pass.
    pub revealed: usize,
}

/// Hides rows by label membership.
///
/// The hidden-label set is per-instance, per-boot state, exactly like the
/// active sort mode. Row label annotations are read fresh from the markup on
/// every application — labels move between rows as the host pleases.
#[derive(Debug, Clone)]
pub struct LabelFilter {
    hidden_labels: BTreeSet<String>,
    label_path: MatcherPath,
    label_attr: String,
}

impl LabelFilter {
    /// Builds a filter reading labels from `label_attr` of elements matching
    /// `label_path` inside each row.
    #[must_use]
    pub fn new(label_path: MatcherPath, label_attr: impl Into<String>) -> Self {
        Self {
            hidden_labels: BTreeSet::new(),
            label_path,
            label_attr: label_attr.into(),
        }
    }

    /// The mail-list defaults: label chips in the row's label region, named
    /// by their `title` attribute.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            MatcherPath::new(vec![
                Matcher::any().class("ar").class("as"),
                Matcher::any().class("at"),
            ]),
            "title",
        )
    }

    /// Marks a label hidden. Returns true if it was newly added.
    pub fn hide(&mut self, label: impl Into<String>) -> bool {
        self.hidden_labels.insert(label.into())
    }

    /// Unmarks a label. Returns true if it was present.
    pub fn show(&mut self, label: &str) -> bool {
        self.hidden_labels.remove(label)
    }

    /// Flips a label's hidden state; returns the new state.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.hidden_labels.remove(label) {
            false
        } else {
            self.hidden_labels.insert(label.to_string());
            true
        }
    }

    /// True when the label is currently hidden.
    #[must_use]
    pub fn is_hidden(&self, label: &str) -> bool {
        self.hidden_labels.contains(label)
    }

    /// True when no label is hidden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hidden_labels.is_empty()
    }

    /// The hidden labels, in order.
    pub fn hidden_labels(&self) -> impl Iterator<Item = &str> {
        self.hidden_labels.iter().map(String::as_str)
    }

    /// Applies the partition to the given rows: rows annotated with any
    /// hidden label are hidden, rows previously hidden by this filter and no
    /// longer matching are revealed. Idempotent.
    pub fn apply(&self, doc: &mut Document, rows: &[NodeId]) -> PartitionOutcome {
        let mut outcome = PartitionOutcome::default();
        for &row in rows {
            let should_hide = doc
                .query_path_all(row, &self.label_path)
                .into_iter()
                .filter_map(|chip| doc.attr(chip, &self.label_attr))
                .any(|label| self.hidden_labels.contains(label));

            if should_hide {
                if !doc.has_class(row, HIDDEN_CLASS) {
                    doc.add_class(row, HIDDEN_CLASS);
                    doc.set_hidden(row, true);
                    outcome.hidden += 1;
                }
            } else if doc.has_class(row, HIDDEN_CLASS) {
                doc.remove_class(row, HIDDEN_CLASS);
                doc.set_hidden(row, false);
                outcome.revealed += 1;
            }
        }
        if outcome.hidden > 0 || outcome.revealed > 0 {
            debug!(
                hidden = outcome.hidden,
                revealed = outcome.revealed,
                "visibility partition applied"
            );
        }
        outcome
    }

    /// Reveals every row this filter hid, regardless of the label set.
    pub fn clear(&self, doc: &mut Document, rows: &[NodeId]) -> usize {
        let mut revealed = 0;
        for &row in rows {
            if doc.has_class(row, HIDDEN_CLASS) {
                doc.remove_class(row, HIDDEN_CLASS);
                doc.set_hidden(row, false);
                revealed += 1;
            }
        }
        revealed
    }
}

impl Default for LabelFilter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
