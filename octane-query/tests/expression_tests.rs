use chrono::DateTime;
use octane_query::{Comparison, Literal, Query};
use pretty_assertions::assert_eq;

// ── Comparisons ──────────────────────────────────────────────────

#[test]
fn equal_to_string() {
    assert_eq!(Query::equal_to("name", "login").render(), "name EQ 'login'");
}

#[test]
fn comparison_operators() {
    assert_eq!(Query::less_than("story_points", 5).render(), "story_points LT 5");
    assert_eq!(Query::greater_than("story_points", 5).render(), "story_points GT 5");
    assert_eq!(Query::less_or_equal("story_points", 5).render(), "story_points LE 5");
    assert_eq!(Query::greater_or_equal("story_points", 5).render(), "story_points GE 5");
    assert_eq!(
        Query::compare("blocked", Comparison::EqualTo, true).render(),
        "blocked EQ true"
    );
}

#[test]
fn null_literal() {
    assert_eq!(Query::equal_to("parent", Literal::Null).render(), "parent EQ null");
}

#[test]
fn string_literal_escapes_quotes_and_backslashes() {
    assert_eq!(
        Query::equal_to("name", r"it's a\b").render(),
        r"name EQ 'it\'s a\\b'"
    );
}

#[test]
fn timestamp_literal_is_caret_wrapped() {
    let ts = DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z").unwrap();
    assert_eq!(
        Query::greater_than("creation_time", ts).render(),
        "creation_time GT ^2024-02-01T00:00:00Z^"
    );
}

#[test]
fn between_range() {
    assert_eq!(Query::between("id", 100, 200).render(), "id BTW 100...200");
}

#[test]
fn in_list_keeps_order() {
    assert_eq!(
        Query::in_list("severity", ["high", "critical", "low"]).unwrap().render(),
        "severity IN 'high','critical','low'"
    );
}

#[test]
fn in_list_without_values_builds_no_filter() {
    assert_eq!(Query::in_list("severity", Vec::<&str>::new()), None);
    assert_eq!(
        Query::in_list("id", [7]).map(|q| q.render()).as_deref(),
        Some("id IN 7")
    );
}

#[test]
fn reference_sub_query() {
    let q = Query::reference("owner", Query::equal_to("id", "1001"));
    assert_eq!(q.render(), "owner EQ {id EQ '1001'}");
}

// ── Logical combinations ─────────────────────────────────────────

#[test]
fn and_is_parenthesized() {
    let q = Query::equal_to("a", 1).and(Query::equal_to("b", 2));
    assert_eq!(q.render(), "(a EQ 1;b EQ 2)");
}

#[test]
fn or_is_parenthesized() {
    let q = Query::equal_to("a", 1).or(Query::equal_to("b", 2));
    assert_eq!(q.render(), "(a EQ 1||b EQ 2)");
}

#[test]
fn operand_order_is_construction_order() {
    let ab = Query::equal_to("a", 1).and(Query::equal_to("b", 2));
    let ba = Query::equal_to("b", 2).and(Query::equal_to("a", 1));
    assert_ne!(ab.render(), ba.render());
}

#[test]
fn nested_combinations_are_not_flattened() {
    let q = Query::equal_to("a", 1)
        .and(Query::equal_to("b", 2))
        .and(Query::equal_to("c", 3).or(Query::equal_to("d", 4)));
    assert_eq!(q.render(), "((a EQ 1;b EQ 2);(c EQ 3||d EQ 4))");
}

#[test]
fn not_wraps_comparison() {
    assert_eq!(Query::equal_to("a", 1).not().render(), "!(a EQ 1)");
}

#[test]
fn not_wraps_range_and_list() {
    assert_eq!(Query::between("id", 1, 9).not().render(), "!(id BTW 1...9)");
    let list = Query::in_list("id", [1, 2]).unwrap();
    assert_eq!(list.not().render(), "!(id IN 1,2)");
}

#[test]
fn not_reuses_group_parentheses() {
    let q = Query::equal_to("a", 1).or(Query::equal_to("b", 2)).not();
    assert_eq!(q.render(), "!(a EQ 1||b EQ 2)");
}

#[test]
fn display_matches_render() {
    let q = Query::equal_to("a", "x").and(Query::less_than("b", 3));
    assert_eq!(format!("{q}"), q.render());
}
