use pretty_assertions::assert_eq;
use rowkeeper_dom::{Document, NodeId};
use rowkeeper_nav::DeepLinkScheme;
use url::Url;

fn row_with(doc: &mut Document, attrs: &[(&str, &str)]) -> NodeId {
    let row = doc.create_element("tr");
    for (k, v) in attrs {
        doc.set_attr(row, *k, *v);
    }
    doc.append_child(doc.root(), row);
    row
}

#[test]
fn composes_the_deep_link_from_the_thread_id() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[("data-legacy-thread-id", "abc123")]);
    let page = Url::parse("https://mail.google.com/mail/u/0/#settings").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://mail.google.com/mail/u/0/#inbox/abc123");
}

#[test]
fn preserves_the_user_index_from_the_page_path() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[("data-legacy-thread-id", "abc123")]);
    let page = Url::parse("https://mail.google.com/mail/u/2/?tab=rm").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://mail.google.com/mail/u/2/#inbox/abc123");
}

#[test]
fn missing_user_index_defaults_to_zero() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[("data-legacy-thread-id", "abc123")]);
    let page = Url::parse("https://mail.google.com/mail/u/").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://mail.google.com/mail/u/0/#inbox/abc123");
}

#[test]
fn id_attributes_are_tried_in_order() {
    let mut doc = Document::new();
    let row = row_with(
        &mut doc,
        &[("data-thread-id", "secondary"), ("data-legacy-thread-id", "primary")],
    );
    let page = Url::parse("https://mail.google.com/mail/u/0/").unwrap();

    let scheme = DeepLinkScheme::mail();
    assert_eq!(scheme.item_id(&doc, row).unwrap(), "primary");
}

#[test]
fn id_carried_by_a_descendant_is_found() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[]);
    let cell = doc.create_element("td");
    doc.set_attr(cell, "data-legacy-thread-id", "nested99");
    doc.append_child(row, cell);
    let page = Url::parse("https://mail.google.com/mail/u/0/").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://mail.google.com/mail/u/0/#inbox/nested99");
}

#[test]
fn falls_back_to_the_first_anchor() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[]);
    let anchor = doc.create_element("a");
    doc.set_attr(anchor, "href", "/mail/u/0/#inbox/from-anchor");
    doc.append_child(row, anchor);
    let page = Url::parse("https://mail.google.com/mail/u/0/").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(
        url.as_str(),
        "https://mail.google.com/mail/u/0/#inbox/from-anchor"
    );
}

#[test]
fn empty_anchors_are_skipped() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[]);
    let empty = doc.create_element("a");
    doc.set_attr(empty, "href", "");
    doc.append_child(row, empty);
    let real = doc.create_element("a");
    doc.set_attr(real, "href", "https://example.com/thread/7");
    doc.append_child(row, real);
    let page = Url::parse("https://mail.google.com/mail/u/0/").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://example.com/thread/7");
}

#[test]
fn rows_without_ids_or_anchors_resolve_to_none() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[]);
    let page = Url::parse("https://mail.google.com/mail/u/0/").unwrap();
    assert_eq!(DeepLinkScheme::mail().resolve(&doc, &page, row), None);
}

#[test]
fn query_strings_are_dropped_from_deep_links() {
    let mut doc = Document::new();
    let row = row_with(&mut doc, &[("data-thread-id", "q1")]);
    let page = Url::parse("https://mail.google.com/mail/u/1/?compose=new#drafts").unwrap();

    let url = DeepLinkScheme::mail().resolve(&doc, &page, row).unwrap();
    assert_eq!(url.as_str(), "https://mail.google.com/mail/u/1/#inbox/q1");
}
