//! Row-text extraction.
//!
//! Which element inside a row carries its title varies across host UI
//! generations, so extraction is a table of sources tried in order, first
//! non-empty text wins. Extraction is total: a row no source understands
//! yields the empty string, and sorting proceeds (availability over
//! precision).

use crate::normalize::normalize_key;
use rowkeeper_dom::{Document, Matcher, MatcherPath, NodeId};
use serde::{Deserialize, Serialize};

/// One way to read display text out of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Text content of the first descendant matching the chain.
    Descendant(MatcherPath),
    /// Value of an attribute on the row element itself (accessible name).
    Attribute(String),
}

/// Ordered fallback table for a row's title text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExtractor {
    sources: Vec<TextSource>,
}

impl KeyExtractor {
    /// Builds an extractor from an explicit source table.
    #[must_use]
    pub fn new(sources: Vec<TextSource>) -> Self {
        Self { sources }
    }

    /// The mail-list defaults: the subject span across known markup
    /// generations, then the row's accessible name.
    #[must_use]
    pub fn mail_subject() -> Self {
        let chain = |steps: Vec<Matcher>| TextSource::Descendant(MatcherPath::new(steps));
        Self::new(vec![
            // Classic subject span.
            chain(vec![Matcher::any().class("y6"), Matcher::any().class("bog")]),
            chain(vec![Matcher::any().class("y6"), Matcher::tag("span")]),
            chain(vec![
                Matcher::tag("span").attr_present("dir"),
                Matcher::any().class("bog"),
            ]),
            // Promotions/social tabs.
            chain(vec![Matcher::any().class("xS"), Matcher::any().class("bqe")]),
            chain(vec![
                Matcher::any().class("xT"),
                Matcher::any().class("y6"),
                Matcher::tag("span"),
            ]),
            // Last resort before the accessible name.
            chain(vec![Matcher::any().class("xT"), Matcher::any().class("y6")]),
            TextSource::Attribute("aria-label".to_string()),
        ])
    }

    /// The sources, in trial order.
    #[must_use]
    pub fn sources(&self) -> &[TextSource] {
        &self.sources
    }

    /// Raw display text for a row: first source that yields non-blank text,
    /// else the empty string. Never fails.
    #[must_use]
    pub fn extract_text(&self, doc: &Document, row: NodeId) -> String {
        for source in &self.sources {
            let text = match source {
                TextSource::Descendant(path) => doc
                    .query_path(row, path)
                    .map(|node| doc.text_content(node))
                    .unwrap_or_default(),
                TextSource::Attribute(name) => {
                    doc.attr(row, name).unwrap_or_default().to_string()
                }
            };
            if !text.trim().is_empty() {
                return text;
            }
        }
        String::new()
    }
}

impl Default for KeyExtractor {
    fn default() -> Self {
        Self::mail_subject()
    }
}

/// Where a row's comparison key comes from.
///
/// Title extraction covers list-style hosts; cell extraction covers
/// column-sorted tables, where the key is a numbered cell's text or a
/// specific element inside it (a status badge, say).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// The row's title region.
    Title(KeyExtractor),
    /// A cell of the row by index, optionally narrowed to an inner element.
    Cell {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inner: Option<Matcher>,
    },
}

impl KeySource {
    /// Title extraction with the default fallback table.
    #[must_use]
    pub fn title() -> Self {
        Self::Title(KeyExtractor::default())
    }

    /// Key from the nth `td` cell's text.
    #[must_use]
    pub fn cell(index: usize) -> Self {
        Self::Cell { index, inner: None }
    }

    /// Key from an element inside the nth `td` cell.
    #[must_use]
    pub fn cell_with(index: usize, inner: Matcher) -> Self {
        Self::Cell {
            index,
            inner: Some(inner),
        }
    }

    /// Raw display text for a row under this source. Total.
    #[must_use]
    pub fn extract_text(&self, doc: &Document, row: NodeId) -> String {
        match self {
            Self::Title(extractor) => extractor.extract_text(doc, row),
            Self::Cell { index, inner } => {
                let cells: Vec<NodeId> = doc
                    .children(row)
                    .iter()
                    .copied()
                    .filter(|&c| doc.tag(c) == "td")
                    .collect();
                let Some(&cell) = cells.get(*index) else {
                    return String::new();
                };
                match inner {
                    Some(matcher) => doc
                        .query(cell, matcher)
                        .map(|node| doc.text_content(node))
                        .unwrap_or_default(),
                    None => doc.text_content(cell),
                }
            }
        }
    }

    /// The normalized comparison key for a row under this source.
    #[must_use]
    pub fn sort_key(&self, doc: &Document, row: NodeId) -> String {
        normalize_key(&self.extract_text(doc, row))
    }
}

impl Default for KeySource {
    fn default() -> Self {
        Self::title()
    }
}
