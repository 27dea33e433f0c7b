use blogsmith::css::{SelectorPattern, Stylesheet, color_token, is_zero_length, px_value};
use spectral::prelude::*;

#[test]
fn selector_pattern_matches_last_compound() {
    let pattern = SelectorPattern::new(&["a", ".btn"]);

    assert_that(&pattern.matches("a")).is_true();
    assert_that(&pattern.matches(".nav a")).is_true();
    assert_that(&pattern.matches("ul > a")).is_true();
    assert_that(&pattern.matches("h1, .btn")).is_true();
    assert_that(&pattern.matches(".data")).is_false();
    assert_that(&pattern.matches("a:hover")).is_false();
    assert_that(&pattern.matches(".btn-primary")).is_false();
}

#[test]
fn rules_are_visited_in_source_order_inside_at_rules() {
    let sheet = Stylesheet::parse(
        "body { color: #111; } @media (max-width: 600px) { body { color: #222; } }",
    );

    let selectors: Vec<&str> = sheet.rules().map(|rule| rule.selectors).collect();

    assert_that(&selectors).is_equal_to(vec!["body", "body"]);
}

#[test]
fn find_skips_matching_rules_without_the_property() {
    let sheet = Stylesheet::parse("body { margin: 0; } body { color: #123; }");
    let pattern = SelectorPattern::new(&["body"]);

    assert_that(&sheet.find(&pattern, &["color"])).is_equal_to(Some("#123".to_owned()));
}

#[test]
fn declaration_values_stop_at_semicolon_or_brace() {
    let sheet = Stylesheet::parse("p { margin-bottom: 1.5rem; color: red }");
    let pattern = SelectorPattern::new(&["p"]);

    assert_that(&sheet.find(&pattern, &["margin-bottom"])).is_equal_to(Some("1.5rem".to_owned()));
    assert_that(&sheet.find(&pattern, &["color"])).is_equal_to(Some("red".to_owned()));
}

#[test]
fn property_names_are_case_insensitive() {
    let sheet = Stylesheet::parse("BODY { Color: #abc; }");
    let pattern = SelectorPattern::new(&["BODY"]);

    assert_that(&sheet.find(&pattern, &["color"])).is_equal_to(Some("#abc".to_owned()));
}

#[test]
fn color_tokens() {
    assert_that(&color_token("1px solid #ddd")).is_equal_to(Some("#ddd"));
    assert_that(&color_token("rgba(0, 0, 0, 0.5) !important")).is_equal_to(Some("rgba(0, 0, 0, 0.5)"));
    assert_that(&color_token("hsl(120, 50%, 50%)")).is_equal_to(Some("hsl(120, 50%, 50%)"));
    assert_that(&color_token("none solid Navy")).is_equal_to(Some("Navy"));
    assert_that(&color_token("inherit")).is_none();
}

#[test]
fn pixel_values() {
    assert_that(&px_value("12.5px 4px")).is_equal_to(Some(12.5));
    assert_that(&px_value("1rem")).is_none();
}

#[test]
fn zero_lengths() {
    for value in ["0", "0px", "0rem", "0 0", "0.0em", "0%"] {
        assert_that(&is_zero_length(value)).is_true();
    }
    for value in ["", "4px", "0 4px", "05px", "none"] {
        assert_that(&is_zero_length(value)).is_false();
    }
}
