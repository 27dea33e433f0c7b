use blogsmith::extract::{classify_button_radius, extract, extract_files};
use blogsmith::profile::{ColorSet, DEFAULT_FOOTER_STYLE, StyleProfile};
use spectral::prelude::*;
use std::fs;
use tempfile::tempdir;

const HEADER_HTML: &str = r#"<html><body><header><nav></nav><img class="logo"></header></body></html>"#;

#[test]
fn empty_css_yields_default_colors() {
    let extraction = extract("", "");

    assert_that(&extraction.profile().colors).is_equal_to(ColorSet::default());
    assert_that(&extraction.is_degraded()).is_true();
}

#[test]
fn css_without_colors_yields_default_colors() {
    let css = "body { margin: 0; padding: 1rem; } h1 { font-size: 3rem; }";

    let extraction = extract("", css);

    assert_that(&extraction.profile().colors).is_equal_to(ColorSet::default());
}

#[test]
fn palette_is_ordered_by_frequency() {
    let css = "a { color: red; } p { color: red; } span { color: blue; } em { color: red; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.palette).is_equal_to(vec!["red".to_owned(), "blue".to_owned()]);
    assert_that(&colors.primary.as_str()).is_equal_to("red");
    assert_that(&colors.secondary.as_str()).is_equal_to("blue");
    assert_that(&colors.accent.as_str()).is_equal_to("#17a2b8");
}

#[test]
fn palette_ties_keep_first_seen_order() {
    let css = ".a { color: #abc; } .b { background-color: #123456; } .c { border-color: green; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.palette).is_equal_to(vec![
        "#abc".to_owned(),
        "#123456".to_owned(),
        "green".to_owned(),
    ]);
}

#[test]
fn first_matching_rule_wins() {
    let css = "body { color: #111111; } body { color: #222222; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.text.as_str()).is_equal_to("#111111");
}

#[test]
fn background_color_is_taken_from_shorthand() {
    let css = "body { background: url(bg.png) #fafafa no-repeat; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.background.as_str()).is_equal_to("#fafafa");
}

#[test]
fn role_colors_default_to_primary() {
    let css = ".x { color: #101010; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.button.as_str()).is_equal_to("#101010");
    assert_that(&colors.link.as_str()).is_equal_to("#101010");
    assert_that(&colors.heading.as_str()).is_equal_to("#101010");
}

#[test]
fn button_radius_classification() {
    let cases = [
        ("0", "Square buttons"),
        ("0px", "Square buttons"),
        ("0rem", "Square buttons"),
        ("3px", "Slightly rounded buttons"),
        ("5px", "Rounded buttons"),
        ("10px", "Rounded buttons"),
        ("20px", "Pill-shaped buttons"),
        ("25px", "Pill-shaped buttons"),
        ("0.5rem", "Rounded buttons"),
        ("50%", "Rounded buttons"),
    ];

    for (radius, expected) in cases {
        assert_that(&classify_button_radius(radius)).is_equal_to(expected);
    }
}

#[test]
fn button_style_comes_from_first_button_rule() {
    let cases = [
        (".btn { border-radius: 0; }", "Square buttons"),
        (".btn { border-radius: 3px; }", "Slightly rounded buttons"),
        ("button { border-radius: 25px; }", "Pill-shaped buttons"),
        (".button { border-radius: 10px; }", "Rounded buttons"),
    ];

    for (css, expected) in cases {
        let components = extract("", css).into_profile().components;
        assert_that(&components.button_style.as_str()).is_equal_to(expected);
    }
}

#[test]
fn button_style_mentions_shadow_and_hover() {
    let css = ".btn { border-radius: 4px; box-shadow: 0 1px 2px #000; background-color: #0a0; } \
               .btn:hover { background-color: #060; }";

    let components = extract("", css).into_profile().components;

    assert_that(&components.button_style.as_str())
        .is_equal_to("Slightly rounded buttons with shadow effect and hover animation");
    assert_that(&components.button_properties.background_color.as_str()).is_equal_to("#0a0");
    assert_that(&components.button_properties.hover_background_color.as_str())
        .is_equal_to("#060");
}

#[test]
fn link_style_and_properties() {
    let css = "a { color: #00aa00; text-decoration: none; } a:hover { color: #005500; }";

    let components = extract("", css).into_profile().components;

    assert_that(&components.link_style.as_str())
        .is_equal_to("Non-underlined links with hover effect");
    assert_that(&components.link_properties.color.as_str()).is_equal_to("#00aa00");
    assert_that(&components.link_properties.hover_color.as_str()).is_equal_to("#005500");
    assert_that(&components.link_properties.decoration.as_str()).is_equal_to("none");
}

#[test]
fn nested_selectors_match_their_last_compound() {
    let css = ".data { color: #ff0000; } .nav a { color: #00ff00; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.link.as_str()).is_equal_to("#00ff00");
}

#[test]
fn card_style_is_classified() {
    let css = ".card { border: 1px solid #dddddd; border-radius: 8px; padding: 20px; }";

    let components = extract("", css).into_profile().components;

    assert_that(&components.card_style.as_str())
        .is_equal_to("Bordered cards with rounded corners and internal padding");
    assert_that(&components.card_properties.padding.as_str()).is_equal_to("20px");
    assert_that(&components.card_properties.border_radius.as_str()).is_equal_to("8px");
}

#[test]
fn header_with_logo_and_navigation() {
    let css = "header{background-color:#111;color:#eee}";

    let layout = extract(HEADER_HTML, css).into_profile().layout;

    assert_that(&layout.header_style.as_str()).is_equal_to("Header with logo and navigation menu");
    assert_that(&layout.header_bg_color).is_equal_to(Some("#111".to_owned()));
    assert_that(&layout.header_text_color).is_equal_to(Some("#eee".to_owned()));
}

#[test]
fn header_and_footer_colors_stay_absent_without_rules() {
    let layout = extract(HEADER_HTML, "").into_profile().layout;

    assert_that(&layout.header_bg_color).is_none();
    assert_that(&layout.footer_text_color).is_none();
}

#[test]
fn footer_classification() {
    let cases = [
        (
            r#"<footer><p>© 2024 Acme</p><a href="/a">A</a><a href="/b">B</a><div class="social-icons"></div></footer>"#,
            "Comprehensive footer with copyright, social links, and navigation",
        ),
        (
            r#"<footer><p>Copyright Acme</p><a href="/a">A</a><a href="/b">B</a></footer>"#,
            "Standard footer with copyright and links",
        ),
        (
            "<footer><p>&copy; Acme</p></footer>",
            "Simple footer with copyright",
        ),
        ("<footer><p>Thanks</p></footer>", DEFAULT_FOOTER_STYLE),
    ];

    for (html, expected) in cases {
        let layout = extract(html, "").into_profile().layout;
        assert_that(&layout.footer_style.as_str()).is_equal_to(expected);
    }
}

#[test]
fn layout_radius_skips_zero_values() {
    let css = ".a { border-radius: 0; } .b { border-radius: 6px; }";

    let layout = extract("", css).into_profile().layout;

    assert_that(&layout.border_radius.as_str()).is_equal_to("6px");
}

#[test]
fn font_names_are_unquoted() {
    let css = r#"h1 { font-family: "Georgia"; } body { font-family: 'Inter', sans-serif; }"#;

    let typography = extract("", css).into_profile().typography;

    assert_that(&typography.heading_font.as_str()).is_equal_to("Georgia");
    assert_that(&typography.body_font.as_str()).is_equal_to("'Inter', sans-serif");
}

#[test]
fn comments_are_ignored() {
    let css = "/* body { color: #999999; } */ body { color: #333; }";

    let colors = extract("", css).into_profile().colors;

    assert_that(&colors.text.as_str()).is_equal_to("#333");
}

#[test]
fn warnings_name_defaulted_fields() {
    let css = "body { color: #333; }";

    let extraction = extract("", css);

    assert_that(&extraction.warnings().iter().any(|w| w.starts_with("colors.secondary"))).is_true();
    assert_that(&extraction.warnings().iter().any(|w| w.starts_with("colors.text"))).is_false();
}

#[test]
fn extract_files_reads_both_sources() {
    let dir = tempdir().unwrap();
    let html_path = dir.path().join("index.html");
    let css_path = dir.path().join("style.css");
    fs::write(&html_path, HEADER_HTML).unwrap();
    fs::write(&css_path, "header{background-color:#111;color:#eee}").unwrap();

    let extraction = extract_files(&html_path, &css_path).unwrap();

    assert_that(&extraction.profile().layout.header_bg_color).is_equal_to(Some("#111".to_owned()));
}

#[test]
fn extract_files_fails_on_missing_file() {
    let dir = tempdir().unwrap();

    let result = extract_files(&dir.path().join("missing.html"), &dir.path().join("missing.css"));

    assert_that(&result.is_err()).is_true();
}

#[test]
fn profile_blob_round_trips_with_camel_case_keys() {
    let profile = extract(HEADER_HTML, "header{background-color:#111;color:#eee}").into_profile();

    let blob = serde_json::to_string(&profile).unwrap();

    assert_that(&blob.contains("\"headingSizes\"")).is_true();
    assert_that(&blob.contains("\"headerBgColor\":\"#111\"")).is_true();
    assert_that(&serde_json::from_str::<StyleProfile>(&blob).unwrap()).is_equal_to(profile);
}

#[test]
fn incomplete_profile_blob_is_filled_with_defaults() {
    let profile: StyleProfile =
        serde_json::from_str(r##"{"colors": {"primary": "#ff0000"}, "layout": {}}"##).unwrap();

    assert_that(&profile.colors.primary.as_str()).is_equal_to("#ff0000");
    assert_that(&profile.colors.secondary.as_str()).is_equal_to("#6c757d");
    assert_that(&profile.typography).is_equal_to(StyleProfile::default().typography);
    assert_that(&profile.business).is_none();
}
