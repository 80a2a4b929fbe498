use pretty_assertions::assert_eq;
use rowkeeper_dom::{Document, Matcher, NodeId};
use rowkeeper_keys::{KeyExtractor, KeySource};

fn mail_row(doc: &mut Document, subject: &str) -> NodeId {
    let row = doc.create_element("tr");
    doc.set_attr(row, "class", "zA");
    let region = doc.create_element("div");
    doc.set_attr(region, "class", "y6");
    let span = doc.create_element("span");
    doc.set_attr(span, "class", "bog");
    doc.set_text(span, subject);
    doc.append_child(region, span);
    doc.append_child(row, region);
    doc.append_child(doc.root(), row);
    row
}

#[test]
fn classic_subject_span_wins() {
    let mut doc = Document::new();
    let row = mail_row(&mut doc, "Quarterly report");
    let extractor = KeyExtractor::default();
    assert_eq!(extractor.extract_text(&doc, row), "Quarterly report");
}

#[test]
fn later_variants_are_tried_in_order() {
    let mut doc = Document::new();
    // Promotions-tab markup: no .y6 at all.
    let row = doc.create_element("tr");
    let cell = doc.create_element("div");
    doc.set_attr(cell, "class", "xS");
    let subject = doc.create_element("span");
    doc.set_attr(subject, "class", "bqe");
    doc.set_text(subject, "Weekend deals");
    doc.append_child(cell, subject);
    doc.append_child(row, cell);
    doc.append_child(doc.root(), row);

    assert_eq!(
        KeyExtractor::default().extract_text(&doc, row),
        "Weekend deals"
    );
}

#[test]
fn accessible_name_is_the_last_fallback() {
    let mut doc = Document::new();
    let row = doc.create_element("tr");
    doc.set_attr(row, "aria-label", "Unread, Invoice overdue");
    doc.append_child(doc.root(), row);

    assert_eq!(
        KeyExtractor::default().extract_text(&doc, row),
        "Unread, Invoice overdue"
    );
}

#[test]
fn unknown_markup_yields_empty_text() {
    let mut doc = Document::new();
    let row = doc.create_element("tr");
    doc.append_child(doc.root(), row);
    assert_eq!(KeyExtractor::default().extract_text(&doc, row), "");
}

#[test]
fn blank_matches_fall_through() {
    let mut doc = Document::new();
    let row = mail_row(&mut doc, "   ");
    doc.set_attr(row, "aria-label", "Actual subject");
    assert_eq!(
        KeyExtractor::default().extract_text(&doc, row),
        "Actual subject"
    );
}

// ── Cell sources ─────────────────────────────────────────────────

fn table_row(doc: &mut Document, cells: &[&str]) -> NodeId {
    let row = doc.create_element("tr");
    for text in cells {
        let cell = doc.create_element("td");
        doc.set_text(cell, *text);
        doc.append_child(row, cell);
    }
    doc.append_child(doc.root(), row);
    row
}

#[test]
fn cell_source_reads_nth_cell() {
    let mut doc = Document::new();
    let row = table_row(&mut doc, &["api", "Online", "Public"]);
    assert_eq!(KeySource::cell(1).extract_text(&doc, row), "Online");
}

#[test]
fn cell_source_narrows_to_inner_element() {
    let mut doc = Document::new();
    let row = table_row(&mut doc, &["api", "", "Public"]);
    let status_cell = doc.children(row)[1];
    let badge = doc.create_element("span");
    doc.set_attr(badge, "class", "badge");
    doc.set_text(badge, "Degraded");
    doc.append_child(status_cell, badge);

    let source = KeySource::cell_with(1, Matcher::any().class("badge"));
    assert_eq!(source.extract_text(&doc, row), "Degraded");
}

#[test]
fn out_of_range_cell_yields_empty() {
    let mut doc = Document::new();
    let row = table_row(&mut doc, &["only one"]);
    assert_eq!(KeySource::cell(5).extract_text(&doc, row), "");
}

#[test]
fn sort_key_normalizes() {
    let mut doc = Document::new();
    let row = mail_row(&mut doc, "  🔥 URGENT   Reply ");
    assert_eq!(KeySource::title().sort_key(&doc, row), "urgent reply");
}
