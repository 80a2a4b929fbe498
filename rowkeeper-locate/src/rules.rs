//! Discovery rule tables.

use rowkeeper_dom::{Matcher, MatcherPath};
use serde::{Deserialize, Serialize};

/// One way a host lays out its row list: where the container lives and what
/// its rows look like. Rules are tried in order; adding support for a new
/// markup generation means appending a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRule {
    /// Short name for diagnostics.
    pub name: String,
    /// Descendant chain locating candidate containers from the root.
    pub container: MatcherPath,
    /// Row signatures (any-of) inside a candidate container.
    pub rows: Vec<Matcher>,
}

impl ListRule {
    /// Builds a rule.
    #[must_use]
    pub fn new(name: impl Into<String>, container: MatcherPath, rows: Vec<Matcher>) -> Self {
        Self {
            name: name.into(),
            container,
            rows,
        }
    }
}

/// The built-in rule table: the grid-semantics layout, its legacy-class
/// predecessor, and a plain dashboard table.
#[must_use]
pub fn default_rules() -> Vec<ListRule> {
    let conversation_rows = vec![Matcher::tag("tr").class("zA"), Matcher::any().role("row")];
    vec![
        ListRule::new(
            "main-grid",
            MatcherPath::new(vec![
                Matcher::tag("div").role("main"),
                Matcher::tag("table").role("grid"),
                Matcher::tag("tbody"),
            ]),
            conversation_rows.clone(),
        ),
        ListRule::new(
            "legacy-list",
            MatcherPath::new(vec![
                Matcher::tag("div").role("main"),
                Matcher::any().class("aeF"),
                Matcher::any().class("UI"),
                Matcher::tag("tbody"),
            ]),
            conversation_rows,
        ),
        ListRule::new(
            "plain-table",
            MatcherPath::new(vec![
                Matcher::tag("table").class("table"),
                Matcher::tag("tbody"),
            ]),
            vec![Matcher::tag("tr")],
        ),
    ]
}

/// Signatures that mark a row as a header/label row rather than content:
/// matched against the row itself or any of its descendants.
#[must_use]
pub fn header_markers() -> Vec<Matcher> {
    vec![Matcher::tag("th"), Matcher::any().role("columnheader")]
}
