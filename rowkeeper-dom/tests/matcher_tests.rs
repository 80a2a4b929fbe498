use pretty_assertions::assert_eq;
use rowkeeper_dom::{AttrRule, Document, Matcher};

fn sample() -> (Document, rowkeeper_dom::NodeId) {
    let mut doc = Document::new();
    let el = doc.create_element("tr");
    doc.set_attr(el, "class", "zA yO");
    doc.set_attr(el, "role", "row");
    doc.set_attr(el, "aria-label", "Archive this conversation");
    doc.append_child(doc.root(), el);
    (doc, el)
}

#[test]
fn empty_matcher_matches_anything() {
    let (doc, el) = sample();
    assert!(Matcher::any().matches(&doc, el));
}

#[test]
fn tag_and_class_conditions() {
    let (doc, el) = sample();
    assert!(Matcher::tag("tr").class("zA").matches(&doc, el));
    assert!(!Matcher::tag("td").matches(&doc, el));
    assert!(!Matcher::tag("tr").class("missing").matches(&doc, el));
}

#[test]
fn role_shorthand_matches_attr() {
    let (doc, el) = sample();
    assert!(Matcher::any().role("row").matches(&doc, el));
    assert!(!Matcher::any().role("grid").matches(&doc, el));
}

#[test]
fn attr_contains_is_case_insensitive() {
    let (doc, el) = sample();
    assert!(
        Matcher::any()
            .attr_contains("aria-label", "archive")
            .matches(&doc, el)
    );
    assert!(
        !Matcher::any()
            .attr_contains("aria-label", "snooze")
            .matches(&doc, el)
    );
}

#[test]
fn attr_present_and_equals() {
    let (doc, el) = sample();
    assert!(Matcher::any().attr_present("aria-label").matches(&doc, el));
    assert!(Matcher::any().attr("role", "row").matches(&doc, el));
    assert!(!Matcher::any().attr_present("data-thread-id").matches(&doc, el));
}

#[test]
fn matcher_round_trips_through_serde() {
    let matcher = Matcher::tag("tr").class("zA").role("row");
    let json = serde_json::to_string(&matcher).unwrap();
    let back: Matcher = serde_json::from_str(&json).unwrap();
    assert_eq!(matcher, back);
}

#[test]
fn attr_rule_serializes_snake_case() {
    let rule = AttrRule::Present("role".to_string());
    assert_eq!(serde_json::to_string(&rule).unwrap(), "{\"present\":\"role\"}");
}
