//! Event classification.

use crate::deeplink::DeepLinkScheme;
use crate::input::{InputEvent, MouseButton};
use rowkeeper_dom::{Document, Matcher, NodeId};
use tracing::debug;
use url::Url;

/// What the embedding should do with a captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the host handle it natively (no row, a control, a context menu,
    /// or no resolvable URL).
    Ignore,
    /// Stop propagation so the host's drag/selection handlers never engage,
    /// but take no navigation action.
    Swallow,
    /// Suppress the default action and propagation, then navigate.
    Navigate { url: Url, new_tab: bool },
}

/// Classifies captured input against the row set.
///
/// Stateless per event: the row is resolved fresh from the event target at
/// dispatch time, never from a stored handle, so sort passes that move rows
/// around cannot invalidate it.
#[derive(Debug, Clone)]
pub struct NavigationInterceptor {
    row_matchers: Vec<Matcher>,
    control_matchers: Vec<Matcher>,
    action_vocabulary: Vec<String>,
    name_attrs: Vec<String>,
    scheme: DeepLinkScheme,
}

impl NavigationInterceptor {
    /// Builds an interceptor with explicit classification tables.
    #[must_use]
    pub fn new(
        row_matchers: Vec<Matcher>,
        control_matchers: Vec<Matcher>,
        action_vocabulary: Vec<String>,
        scheme: DeepLinkScheme,
    ) -> Self {
        Self {
            row_matchers,
            control_matchers,
            action_vocabulary,
            name_attrs: vec![
                "aria-label".to_string(),
                "title".to_string(),
                "data-tooltip".to_string(),
            ],
            scheme,
        }
    }

    /// The mail-list defaults: conversation rows, the usual embedded
    /// controls, and the quick-action vocabulary.
    #[must_use]
    pub fn mail() -> Self {
        Self::new(
            vec![Matcher::tag("tr").class("zA"), Matcher::any().role("row")],
            vec![
                Matcher::any().role("checkbox"),
                Matcher::any().role("button"),
                Matcher::tag("button"),
                Matcher::tag("input"),
            ],
            [
                "archive",
                "delete",
                "label",
                "snooze",
                "move to",
                "mark as read",
                "mark as unread",
                "mute",
                "report spam",
                "star",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            DeepLinkScheme::mail(),
        )
    }

    /// The deep-link scheme in use.
    #[must_use]
    pub fn scheme(&self) -> &DeepLinkScheme {
        &self.scheme
    }

    /// Classifies one event. Total and side-effect free.
    #[must_use]
    pub fn decide(&self, doc: &Document, page_url: &Url, event: &InputEvent) -> Verdict {
        let target = event.target();
        let Some(row) = self.enclosing_row(doc, target) else {
            return Verdict::Ignore;
        };

        match event {
            // Context menus and secondary clicks belong to the host.
            InputEvent::ContextMenu { .. } => Verdict::Ignore,
            InputEvent::Click {
                button: MouseButton::Secondary,
                ..
            } => Verdict::Ignore,

            _ if self.is_control(doc, target, row) => Verdict::Ignore,

            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } => Verdict::Swallow,

            InputEvent::Click {
                button, modifiers, ..
            } => match self.scheme.resolve(doc, page_url, row) {
                Some(url) => Verdict::Navigate {
                    url,
                    new_tab: modifiers.requests_new_tab()
                        || *button == MouseButton::Auxiliary,
                },
                None => {
                    debug!(%row, "no navigation target; leaving click to the host");
                    Verdict::Ignore
                }
            },

            InputEvent::KeyEnter { modifiers, .. } => {
                match self.scheme.resolve(doc, page_url, row) {
                    Some(url) => Verdict::Navigate {
                        url,
                        new_tab: modifiers.requests_new_tab(),
                    },
                    None => Verdict::Ignore,
                }
            }
        }
    }

    fn enclosing_row(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        self.row_matchers
            .iter()
            .find_map(|matcher| doc.closest(target, matcher))
    }

    /// True when the target (or anything between it and the row) is an
    /// embedded control: structurally, or by accessible name speaking the
    /// action vocabulary.
    fn is_control(&self, doc: &Document, target: NodeId, row: NodeId) -> bool {
        let mut node = target;
        loop {
            if node == row {
                return false;
            }
            if self.control_matchers.iter().any(|m| m.matches(doc, node)) {
                return true;
            }
            if self.speaks_action(doc, node) {
                return true;
            }
            match doc.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn speaks_action(&self, doc: &Document, node: NodeId) -> bool {
        self.name_attrs.iter().any(|attr| {
            doc.attr(node, attr).is_some_and(|name| {
                let name = name.to_lowercase();
                self.action_vocabulary
                    .iter()
                    .any(|word| name.contains(word))
            })
        })
    }
}

impl Default for NavigationInterceptor {
    fn default() -> Self {
        Self::mail()
    }
}
