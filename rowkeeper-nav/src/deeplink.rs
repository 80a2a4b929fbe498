//! Deep-link synthesis following the host's observed URL scheme.

use rowkeeper_dom::{Document, Matcher, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// How to build the host's canonical URL for a row's detail view.
///
/// The host addresses items as
/// `scheme://host/…/<user_marker>/<user index>/#<view_fragment>/<item id>`,
/// with the user/session index coming from the current page's own path. The
/// item identifier is read from the row's markup via `id_attributes`, tried
/// in order on the row itself and then on its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLinkScheme {
    /// Attributes carrying the stable item identifier.
    pub id_attributes: Vec<String>,
    /// Path segment that precedes the user index ("u" in `/mail/u/0/`).
    /// `None` keeps the page path untouched.
    pub user_path_marker: Option<String>,
    /// Fragment prefix of the detail view ("inbox" → `#inbox/<id>`).
    pub view_fragment: String,
}

impl DeepLinkScheme {
    /// The mail host's scheme: thread ids on the row, `/mail/u/<n>/`
    /// user-indexed paths, `#inbox/<id>` detail fragments.
    #[must_use]
    pub fn mail() -> Self {
        Self {
            id_attributes: vec![
                "data-legacy-thread-id".to_string(),
                "data-thread-id".to_string(),
            ],
            user_path_marker: Some("u".to_string()),
            view_fragment: "inbox".to_string(),
        }
    }

    /// Resolves a navigation URL for `row`, preferring a synthesized deep
    /// link and falling back to the row's first anchor. `None` means the
    /// click must be left to the host.
    #[must_use]
    pub fn resolve(&self, doc: &Document, page_url: &Url, row: NodeId) -> Option<Url> {
        if let Some(id) = self.item_id(doc, row)
            && let Some(url) = self.compose(page_url, &id)
        {
            return Some(url);
        }
        self.anchor_fallback(doc, page_url, row)
    }

    /// The row's stable item identifier, if its markup exposes one.
    #[must_use]
    pub fn item_id(&self, doc: &Document, row: NodeId) -> Option<String> {
        for attr in &self.id_attributes {
            if let Some(value) = doc.attr(row, attr)
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
            if let Some(carrier) = doc.query(row, &Matcher::any().attr_present(attr))
                && let Some(value) = doc.attr(carrier, attr)
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
        None
    }

    /// Composes the deep link from the page URL and an item id.
    fn compose(&self, page_url: &Url, id: &str) -> Option<Url> {
        let mut url = page_url.clone();
        if let Some(marker) = &self.user_path_marker {
            let segments: Vec<&str> = page_url.path_segments()?.collect();
            let mut path = Vec::new();
            let mut found = false;
            for (i, segment) in segments.iter().enumerate() {
                path.push(segment.to_string());
                if *segment == *marker {
                    // The user index follows the marker; absent or
                    // non-numeric means the default account.
                    let index = segments
                        .get(i + 1)
                        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
                        .unwrap_or(&"0");
                    path.push((*index).to_string());
                    found = true;
                    break;
                }
            }
            if found {
                url.set_path(&format!("/{}/", path.join("/")));
            }
        }
        url.set_query(None);
        url.set_fragment(Some(&format!("{}/{}", self.view_fragment, id)));
        Some(url)
    }

    /// First usable anchor inside the row, resolved against the page URL.
    fn anchor_fallback(&self, doc: &Document, page_url: &Url, row: NodeId) -> Option<Url> {
        for anchor in doc.query_all(row, &Matcher::tag("a").attr_present("href")) {
            let Some(href) = doc.attr(anchor, "href") else {
                continue;
            };
            if href.is_empty() {
                continue;
            }
            match page_url.join(href) {
                Ok(url) => return Some(url),
                Err(err) => {
                    debug!(href, %err, "unusable anchor href; trying next");
                }
            }
        }
        None
    }
}

impl Default for DeepLinkScheme {
    fn default() -> Self {
        Self::mail()
    }
}
