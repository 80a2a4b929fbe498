//! The locator and its container cache.

use crate::rules::{default_rules, header_markers, ListRule};
use rowkeeper_dom::{Document, Matcher, NodeId};
use rowkeeper_types::Millis;
use tracing::debug;

/// A successful discovery: the container and its sortable rows, in current
/// document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub container: NodeId,
    pub rows: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct CachedContainer {
    container: NodeId,
    rule: usize,
    valid_until: Millis,
}

/// Finds the live list container and its rows.
///
/// Holds the rule table and the bounded container cache; one locator per
/// reconciler instance.
#[derive(Debug)]
pub struct RowLocator {
    rules: Vec<ListRule>,
    header_markers: Vec<Matcher>,
    cache_validity_ms: u64,
    cache: Option<CachedContainer>,
}

impl RowLocator {
    /// Builds a locator over an explicit rule table.
    #[must_use]
    pub fn new(rules: Vec<ListRule>, cache_validity_ms: u64) -> Self {
        Self {
            rules,
            header_markers: header_markers(),
            cache_validity_ms,
            cache: None,
        }
    }

    /// The built-in rule table with a one-second cache window.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(default_rules(), 1_000)
    }

    /// Drops the cached container, forcing the next call to rescan.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Finds the current list container, or `None` if the host has not
    /// rendered one yet ("try again later", never fatal).
    pub fn locate_container(&mut self, doc: &Document, now: Millis) -> Option<NodeId> {
        if let Some(cache) = self.cache
            && now < cache.valid_until
            && doc.is_attached(cache.container)
        {
            return Some(cache.container);
        }

        for (idx, rule) in self.rules.iter().enumerate() {
            for candidate in doc.query_path_all(doc.root(), &rule.container) {
                if self.rows_in(doc, candidate, &rule.rows, false).is_empty() {
                    continue;
                }
                let stale = self.cache.map(|c| c.container) != Some(candidate);
                if stale {
                    debug!(rule = %rule.name, container = %candidate, "list container located");
                }
                self.cache = Some(CachedContainer {
                    container: candidate,
                    rule: idx,
                    valid_until: now.plus(self.cache_validity_ms),
                });
                return Some(candidate);
            }
        }
        self.cache = None;
        None
    }

    /// The sortable rows of `container`, in current document order: visible,
    /// row-shaped, not a header/label row.
    #[must_use]
    pub fn locate_rows(&self, doc: &Document, container: NodeId) -> Vec<NodeId> {
        self.rows_of(doc, container, false)
    }

    /// Like [`RowLocator::locate_rows`] but keeps hidden rows. Visibility
    /// partitioning needs this: a row it hid earlier must stay reachable so
    /// it can be revealed again.
    #[must_use]
    pub fn locate_rows_including_hidden(&self, doc: &Document, container: NodeId) -> Vec<NodeId> {
        self.rows_of(doc, container, true)
    }

    fn rows_of(&self, doc: &Document, container: NodeId, include_hidden: bool) -> Vec<NodeId> {
        let matchers: Vec<Matcher> = match self.cache {
            Some(cache) if cache.container == container => self.rules[cache.rule].rows.clone(),
            _ => self
                .rules
                .iter()
                .flat_map(|r| r.rows.iter().cloned())
                .collect(),
        };
        self.rows_in(doc, container, &matchers, include_hidden)
    }

    /// Container and rows in one call.
    pub fn locate(&mut self, doc: &Document, now: Millis) -> Option<Located> {
        let container = self.locate_container(doc, now)?;
        Some(Located {
            container,
            rows: self.locate_rows(doc, container),
        })
    }

    fn rows_in(
        &self,
        doc: &Document,
        container: NodeId,
        matchers: &[Matcher],
        include_hidden: bool,
    ) -> Vec<NodeId> {
        doc.descendants(container)
            .into_iter()
            .filter(|&node| matchers.iter().any(|m| m.matches(doc, node)))
            .filter(|&node| include_hidden || doc.is_visible(node))
            .filter(|&node| !self.is_header(doc, node))
            .collect()
    }

    fn is_header(&self, doc: &Document, row: NodeId) -> bool {
        let marked = self
            .header_markers
            .iter()
            .any(|m| m.matches(doc, row) || doc.query(row, m).is_some());
        marked
            || doc
                .ancestors(row)
                .into_iter()
                .any(|a| doc.tag(a) == "thead")
    }
}

impl Default for RowLocator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
