//! Data-driven structural predicates.
//!
//! Host markup churns; branching code written against it rots. Matchers keep
//! the host-specific knowledge in data: a fallback chain is a `Vec<Matcher>`
//! or a [`MatcherPath`] tried in order, and supporting a new markup variant
//! means appending an entry, not editing logic.

use crate::document::{Document, NodeId};
use serde::{Deserialize, Serialize};

/// One attribute condition of a [`Matcher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrRule {
    /// The attribute exists, with any value.
    Present(String),
    /// The attribute equals the value exactly.
    Equals(String, String),
    /// The attribute value contains the substring (case-insensitive).
    Contains(String, String),
}

impl AttrRule {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Self::Present(name) => doc.attr(node, name).is_some(),
            Self::Equals(name, value) => doc.attr(node, name) == Some(value.as_str()),
            Self::Contains(name, value) => doc
                .attr(node, name)
                .is_some_and(|v| v.to_lowercase().contains(&value.to_lowercase())),
        }
    }
}

/// A structural predicate over one element: tag, class tokens, attribute
/// conditions. All listed conditions must hold; an empty matcher matches
/// every element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attrs: Vec<AttrRule>,
}

impl Matcher {
    /// A matcher with no conditions (matches any element).
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// A matcher requiring the given tag name.
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Requires a class token.
    #[must_use]
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.classes.push(class_name.into());
        self
    }

    /// Requires `role="…"` (ARIA role).
    #[must_use]
    pub fn role(self, role: impl Into<String>) -> Self {
        self.attr("role", role)
    }

    /// Requires an attribute to equal a value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(AttrRule::Equals(name.into(), value.into()));
        self
    }

    /// Requires an attribute to be present with any value.
    #[must_use]
    pub fn attr_present(mut self, name: impl Into<String>) -> Self {
        self.attrs.push(AttrRule::Present(name.into()));
        self
    }

    /// Requires an attribute value to contain a substring (case-insensitive).
    #[must_use]
    pub fn attr_contains(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(AttrRule::Contains(name.into(), value.into()));
        self
    }

    /// Evaluates the predicate against one element.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag
            && doc.tag(node) != tag
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|rule| rule.matches(doc, node))
    }
}

/// A descendant chain of matchers — the equivalent of a CSS descendant
/// selector like `div[role=main] table[role=grid] tbody`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatcherPath(Vec<Matcher>);

impl MatcherPath {
    /// Builds a path from its steps, outermost first.
    #[must_use]
    pub fn new(steps: Vec<Matcher>) -> Self {
        Self(steps)
    }

    /// The chain's steps, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[Matcher] {
        &self.0
    }
}

impl From<Vec<Matcher>> for MatcherPath {
    fn from(steps: Vec<Matcher>) -> Self {
        Self(steps)
    }
}
