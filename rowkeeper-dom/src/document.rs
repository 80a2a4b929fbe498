//! The document arena and its structural operations.

use crate::matcher::{Matcher, MatcherPath};
use crate::mutation::MutationRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// Handle to one node in a [`Document`].
///
/// Handles stay valid for the life of the document; a node detached by the
/// host (or by a sort pass) keeps its identity, attributes, and subtree, and
/// may be reattached later. Callers must still check [`Document::is_attached`]
/// before trusting a handle that crossed a suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            text: String::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An in-memory host document.
///
/// Structural writes (`append_child`, `insert_before`, `detach`) are recorded
/// in a journal drained via [`Document::take_mutations`], mirroring how a
/// mutation observer reports child-list changes — including the changes the
/// engine itself makes, which is what the reconciler's suppression flag
/// exists to mask.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    journal: Vec<MutationRecord>,
}

impl Document {
    /// Creates an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new("#document".to_string())],
            journal: Vec::new(),
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever created (attached or not).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Creates a new detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(tag.into()));
        id
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    // ── Attributes and text ──────────────────────────────────────

    /// The element's tag name.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    /// Reads an attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing any existing value.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let node = self.node_mut(id);
        match node.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => node.attrs.push((name, value)),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let node = self.node_mut(id);
        let pos = node.attrs.iter().position(|(k, _)| k == name)?;
        Some(node.attrs.remove(pos).1)
    }

    /// True when the whitespace-separated `class` attribute contains `class_name`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|v| v.split_whitespace().any(|c| c == class_name))
    }

    /// Adds a class token if not already present.
    pub fn add_class(&mut self, id: NodeId, class_name: &str) {
        if self.has_class(id, class_name) {
            return;
        }
        let joined = match self.attr(id, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class_name}"),
            _ => class_name.to_string(),
        };
        self.set_attr(id, "class", joined);
    }

    /// Removes a class token if present.
    pub fn remove_class(&mut self, id: NodeId, class_name: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let remaining = existing
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", remaining);
    }

    /// Sets the element's own text (not its subtree).
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.node_mut(id).text = text.into();
    }

    /// The element's own text.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    /// Concatenated text of the element and its subtree, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        out.push_str(&self.node(id).text);
        for &child in &self.node(id).children {
            self.collect_text(child, out);
        }
    }

    // ── Visibility ───────────────────────────────────────────────

    /// Marks the element hidden or shown (host-controlled display state).
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        self.node_mut(id).hidden = hidden;
    }

    /// True when the element itself carries the hidden flag.
    #[must_use]
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.node(id).hidden
    }

    /// True when the element is attached and neither it nor any ancestor is
    /// hidden — the equivalent of having a layout box.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            if self.node(node).hidden {
                return false;
            }
            current = self.node(node).parent;
        }
        true
    }

    // ── Structure ────────────────────────────────────────────────

    /// The element's parent, if attached to one.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The element's children, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// True when the element is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Ancestors nearest-first, ending at the root. Excludes `id` itself.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(node) = current {
            out.push(node);
            current = self.node(node).parent;
        }
        out
    }

    /// Descendants in document (preorder) order. Excludes `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.node(node).children.iter().rev());
        }
        out
    }

    /// Appends `child` as the last child of `parent`, moving it from its
    /// current position if attached (browser `appendChild` semantics, and the
    /// mechanism behind move-in-place reordering: the same live node is
    /// relocated, never recreated).
    ///
    /// Returns false without mutating on a structural misuse (appending the
    /// root, or appending a node into its own subtree); the host owns this
    /// tree, so misuse degrades to a no-op rather than failing the caller.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.attach(parent, child, None)
    }

    /// Inserts `child` immediately before `reference` among `parent`'s
    /// children, with the same move semantics as [`Document::append_child`].
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> bool {
        self.attach(parent, child, Some(reference))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> bool {
        if child == self.root() || child == parent {
            warn!(%parent, %child, "rejected structural write: cannot attach node here");
            return false;
        }
        if self.ancestors(parent).contains(&child) {
            warn!(%parent, %child, "rejected structural write: would create a cycle");
            return false;
        }
        if let Some(reference) = reference
            && self.node(reference).parent != Some(parent)
        {
            warn!(%parent, %reference, "rejected structural write: reference is not a child");
            return false;
        }

        if let Some(old_parent) = self.node(child).parent {
            let pos = self
                .node(old_parent)
                .children
                .iter()
                .position(|&c| c == child);
            if let Some(pos) = pos {
                self.node_mut(old_parent).children.remove(pos);
            }
            self.journal.push(MutationRecord { parent: old_parent });
        }

        let insert_at = match reference {
            Some(reference) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == reference)
                .unwrap_or(self.node(parent).children.len()),
            None => self.node(parent).children.len(),
        };
        self.node_mut(parent).children.insert(insert_at, child);
        self.node_mut(child).parent = Some(parent);
        self.journal.push(MutationRecord { parent });
        true
    }

    /// Detaches the element from its parent. The subtree stays intact and
    /// the handle stays valid. Returns false if already detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).parent else {
            return false;
        };
        let pos = self.node(parent).children.iter().position(|&c| c == id);
        if let Some(pos) = pos {
            self.node_mut(parent).children.remove(pos);
        }
        self.node_mut(id).parent = None;
        self.journal.push(MutationRecord { parent });
        true
    }

    // ── Queries ──────────────────────────────────────────────────

    /// The nearest of `id` or its ancestors matching `matcher`.
    #[must_use]
    pub fn closest(&self, id: NodeId, matcher: &Matcher) -> Option<NodeId> {
        if matcher.matches(self, id) {
            return Some(id);
        }
        self.ancestors(id)
            .into_iter()
            .find(|&node| matcher.matches(self, node))
    }

    /// First descendant of `scope` matching `matcher`, in document order.
    #[must_use]
    pub fn query(&self, scope: NodeId, matcher: &Matcher) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&node| matcher.matches(self, node))
    }

    /// All descendants of `scope` matching `matcher`, in document order.
    #[must_use]
    pub fn query_all(&self, scope: NodeId, matcher: &Matcher) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&node| matcher.matches(self, node))
            .collect()
    }

    /// First node matching a descendant chain under `scope`.
    #[must_use]
    pub fn query_path(&self, scope: NodeId, path: &MatcherPath) -> Option<NodeId> {
        self.query_path_all(scope, path).into_iter().next()
    }

    /// All nodes matching a descendant chain under `scope`, in document
    /// order. An empty path matches `scope` itself.
    #[must_use]
    pub fn query_path_all(&self, scope: NodeId, path: &MatcherPath) -> Vec<NodeId> {
        let mut current = vec![scope];
        for step in path.steps() {
            let mut seen = HashSet::new();
            let mut next = Vec::new();
            for &node in &current {
                for candidate in self.query_all(node, step) {
                    if seen.insert(candidate) {
                        next.push(candidate);
                    }
                }
            }
            current = next;
        }
        if path.steps().is_empty() {
            return vec![scope];
        }
        current
    }

    // ── Mutation journal ─────────────────────────────────────────

    /// Drains the structural-change journal accumulated since the last
    /// drain. Multiple underlying changes may collapse into one batch; a
    /// consumer must never assume one record per discrete change.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.journal)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
