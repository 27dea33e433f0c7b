//! The extract module infers a [`StyleProfile`] from a website's raw HTML and
//! CSS text.
//!
//! Extraction is best-effort per field: every probe that finds nothing falls
//! back to the documented default for that field and is recorded as a
//! warning, so callers can tell a fully extracted profile from a degraded one.
//! Probes are first-match-wins scans (see [`crate::css`]); later or more
//! specific rules never override an earlier match.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector as ScraperSelector};

use crate::css::{SelectorPattern, Stylesheet, color_token, is_zero_length, px_value};
use crate::profile::{
    self, ButtonProperties, CardProperties, ColorSet, ComponentSet, HeadingSizes, LayoutSet,
    LinkProperties, StyleProfile, TypographySet,
};

const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "background",
    "background-color",
    "border-color",
    "fill",
    "stroke",
];
const BACKGROUND_PROPERTIES: &[&str] = &["background", "background-color"];

static PAGE_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&["body", "html", ":root", ".main", ".container", "main", "#main"])
});
static BUTTON_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&[".btn", "button", ".button", r#"input[type="submit"]"#])
});
static BUTTON_HOVER_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&[
        ".btn:hover",
        "button:hover",
        ".button:hover",
        r#"input[type="submit"]:hover"#,
    ])
});
static LINK_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| SelectorPattern::new(&["a"]));
static LINK_HOVER_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["a:hover"]));
static HEADING_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["h1", "h2", "h3", ".heading"]));
static BODY_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["body", "html", "p"]));
static H1_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| SelectorPattern::new(&["h1"]));
static H2_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| SelectorPattern::new(&["h2"]));
static H3_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| SelectorPattern::new(&["h3"]));
static PARAGRAPH_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| SelectorPattern::new(&["p"]));
static CONTAINER_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&[".container", ".wrapper", ".content", "main", "#main"])
});
static SPACING_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&[".container", ".wrapper", ".content", "body", ":root"])
});
static CONTENT_SELECTORS: Lazy<SelectorPattern> = Lazy::new(|| {
    SelectorPattern::new(&[".content", "main", "article", "section", ".main"])
});
static SECTION_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["section", "article", ".section"]));
static HEADER_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["header", ".header", ".site-header"]));
static FOOTER_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&["footer", ".footer", ".site-footer"]));
static CARD_SELECTORS: Lazy<SelectorPattern> =
    Lazy::new(|| SelectorPattern::new(&[".card", ".box", ".container", ".panel"]));

static COPYRIGHT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)copyright|©").expect("Failed to compile COPYRIGHT regex"));

const BUTTON_SLIGHT_RADIUS_PX: f64 = 5.0;
const BUTTON_PILL_RADIUS_PX: f64 = 20.0;

/// Outcome of a style extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Every probed field was found in the source.
    Complete(StyleProfile),
    /// Some fields fell back to defaults; one warning per defaulted field.
    Degraded(StyleProfile, Vec<String>),
}

impl Extraction {
    pub fn profile(&self) -> &StyleProfile {
        match self {
            Self::Complete(profile) | Self::Degraded(profile, _) => profile,
        }
    }

    pub fn into_profile(self) -> StyleProfile {
        match self {
            Self::Complete(profile) | Self::Degraded(profile, _) => profile,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Complete(_) => &[],
            Self::Degraded(_, warnings) => warnings,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(..))
    }
}

/// Collects the fields that fell back to their defaults.
#[derive(Default)]
struct Probe {
    warnings: Vec<String>,
}

impl Probe {
    fn or_default(&mut self, field: &str, found: Option<String>, default: &str) -> String {
        match found {
            Some(value) => value,
            None => {
                debug!("No match for {field}, using default {default}");
                self.warnings
                    .push(format!("{field}: not found, using default {default}"));
                default.to_owned()
            }
        }
    }
}

/// Extracts a style profile from HTML and CSS text. Never fails; see
/// [`Extraction`] for how fallbacks are reported.
pub fn extract(html: &str, css: &str) -> Extraction {
    let stylesheet = Stylesheet::parse(css);
    let document = Html::parse_document(html);
    let mut probe = Probe::default();

    let colors = extract_colors(&stylesheet, &mut probe);
    let typography = extract_typography(&stylesheet, &mut probe);
    let layout = extract_layout(&document, &stylesheet, &mut probe);
    let components = extract_components(&stylesheet, &colors, &mut probe);

    let profile = StyleProfile {
        colors,
        typography,
        layout,
        components,
        business: None,
    };

    if probe.warnings.is_empty() {
        Extraction::Complete(profile)
    } else {
        Extraction::Degraded(profile, probe.warnings)
    }
}

/// Reads both files and runs [`extract`] over their contents.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn extract_files(html_path: &Path, css_path: &Path) -> Result<Extraction> {
    let html = fs::read_to_string(html_path)
        .context(format!("Failed to read HTML file: {}", html_path.display()))?;
    let css = fs::read_to_string(css_path)
        .context(format!("Failed to read CSS file: {}", css_path.display()))?;
    Ok(extract(&html, &css))
}

/// Distinct colors in order of descending frequency, ties kept in first-seen order.
fn rank_colors<'a>(colors: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counted: Vec<(&str, usize)> = Vec::new();
    for color in colors {
        match counted.iter_mut().find(|(seen, _)| *seen == color) {
            Some((_, count)) => *count += 1,
            None => counted.push((color, 1)),
        }
    }
    counted.sort_by(|(_, left), (_, right)| right.cmp(left));
    counted.into_iter().map(|(color, _)| color.to_owned()).collect()
}

fn color_value(value: String) -> String {
    color_token(&value).map(str::to_owned).unwrap_or(value)
}

fn extract_colors(sheet: &Stylesheet, probe: &mut Probe) -> ColorSet {
    let palette = rank_colors(sheet.values(COLOR_PROPERTIES).filter_map(color_token));

    let primary = probe.or_default("colors.primary", palette.first().cloned(), profile::DEFAULT_PRIMARY);
    let secondary = probe.or_default(
        "colors.secondary",
        palette.get(1).cloned(),
        profile::DEFAULT_SECONDARY,
    );
    let accent = probe.or_default("colors.accent", palette.get(2).cloned(), profile::DEFAULT_ACCENT);

    let background = probe.or_default(
        "colors.background",
        sheet
            .find(&PAGE_SELECTORS, BACKGROUND_PROPERTIES)
            .map(color_value),
        profile::DEFAULT_BACKGROUND,
    );
    let text = probe.or_default(
        "colors.text",
        sheet.find(&PAGE_SELECTORS, &["color"]).map(color_value),
        profile::DEFAULT_TEXT,
    );
    let button = probe.or_default(
        "colors.button",
        sheet
            .find(&BUTTON_SELECTORS, BACKGROUND_PROPERTIES)
            .map(color_value),
        &primary,
    );
    let link = probe.or_default(
        "colors.link",
        sheet.find(&LINK_SELECTORS, &["color"]).map(color_value),
        &primary,
    );
    let heading = probe.or_default(
        "colors.heading",
        sheet.find(&HEADING_SELECTORS, &["color"]).map(color_value),
        &primary,
    );
    let border = probe.or_default(
        "colors.border",
        sheet
            .values(&["border", "border-color"])
            .find_map(color_token)
            .map(str::to_owned),
        profile::DEFAULT_BORDER,
    );

    ColorSet {
        primary,
        secondary,
        background,
        text,
        accent,
        button,
        link,
        heading,
        border,
        palette,
    }
}

/// Strips quotes around a single family name; font lists are kept verbatim.
fn unquote(value: String) -> String {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .filter(|inner| !inner.contains(['"', '\'']))
        .map_or_else(|| value.clone(), str::to_owned)
}

fn extract_typography(sheet: &Stylesheet, probe: &mut Probe) -> TypographySet {
    let mut lookup = |field: &str, pattern: &SelectorPattern, property: &str, default: &str| {
        probe.or_default(field, sheet.find(pattern, &[property]), default)
    };

    let heading_sizes = HeadingSizes {
        h1: lookup("typography.headingSizes.h1", &H1_SELECTORS, "font-size", profile::DEFAULT_H1_SIZE),
        h2: lookup("typography.headingSizes.h2", &H2_SELECTORS, "font-size", profile::DEFAULT_H2_SIZE),
        h3: lookup("typography.headingSizes.h3", &H3_SELECTORS, "font-size", profile::DEFAULT_H3_SIZE),
    };

    TypographySet {
        heading_font: unquote(lookup(
            "typography.headingFont",
            &HEADING_SELECTORS,
            "font-family",
            profile::DEFAULT_FONT,
        )),
        body_font: unquote(lookup(
            "typography.bodyFont",
            &BODY_SELECTORS,
            "font-family",
            profile::DEFAULT_FONT,
        )),
        heading_sizes,
        body_size: lookup(
            "typography.bodySize",
            &BODY_SELECTORS,
            "font-size",
            profile::DEFAULT_BODY_SIZE,
        ),
        heading_weight: lookup(
            "typography.headingWeight",
            &HEADING_SELECTORS,
            "font-weight",
            profile::DEFAULT_HEADING_WEIGHT,
        ),
        body_weight: lookup(
            "typography.bodyWeight",
            &BODY_SELECTORS,
            "font-weight",
            profile::DEFAULT_BODY_WEIGHT,
        ),
        heading_line_height: lookup(
            "typography.headingLineHeight",
            &HEADING_SELECTORS,
            "line-height",
            profile::DEFAULT_HEADING_LINE_HEIGHT,
        ),
        body_line_height: lookup(
            "typography.bodyLineHeight",
            &BODY_SELECTORS,
            "line-height",
            profile::DEFAULT_BODY_LINE_HEIGHT,
        ),
        heading_style: lookup(
            "typography.headingStyle",
            &HEADING_SELECTORS,
            "font-style",
            profile::DEFAULT_FONT_STYLE,
        ),
        body_style: lookup(
            "typography.bodyStyle",
            &BODY_SELECTORS,
            "font-style",
            profile::DEFAULT_FONT_STYLE,
        ),
        paragraph_spacing: lookup(
            "typography.paragraphSpacing",
            &PARAGRAPH_SELECTORS,
            "margin-bottom",
            profile::DEFAULT_PARAGRAPH_SPACING,
        ),
    }
}

fn extract_layout(document: &Html, sheet: &Stylesheet, probe: &mut Probe) -> LayoutSet {
    let container_width = probe.or_default(
        "layout.containerWidth",
        sheet.find(&CONTAINER_SELECTORS, &["max-width", "width"]),
        profile::DEFAULT_CONTAINER_WIDTH,
    );
    let spacing = probe.or_default(
        "layout.spacing",
        sheet.find(&SPACING_SELECTORS, &["padding", "margin"]),
        profile::DEFAULT_SPACING,
    );
    let content_padding = probe.or_default(
        "layout.contentPadding",
        sheet.find(&CONTENT_SELECTORS, &["padding"]),
        profile::DEFAULT_CONTENT_PADDING,
    );
    let section_margin = probe.or_default(
        "layout.sectionMargin",
        sheet.find(&SECTION_SELECTORS, &["margin-bottom", "margin-top"]),
        profile::DEFAULT_SECTION_MARGIN,
    );
    let border_radius = probe.or_default(
        "layout.borderRadius",
        sheet
            .values(&["border-radius"])
            .find(|value| !is_zero_length(value))
            .map(str::to_owned),
        profile::DEFAULT_RADIUS,
    );
    let box_shadow = probe.or_default(
        "layout.boxShadow",
        sheet.values(&["box-shadow"]).next().map(str::to_owned),
        profile::DEFAULT_SHADOW,
    );
    let header_style = probe.or_default(
        "layout.headerStyle",
        classify_header(document).map(str::to_owned),
        profile::DEFAULT_HEADER_STYLE,
    );
    let footer_style = probe.or_default(
        "layout.footerStyle",
        classify_footer(document).map(str::to_owned),
        profile::DEFAULT_FOOTER_STYLE,
    );

    LayoutSet {
        container_width,
        spacing,
        header_style,
        footer_style,
        content_padding,
        section_margin,
        border_radius,
        box_shadow,
        header_bg_color: sheet.find(&HEADER_SELECTORS, BACKGROUND_PROPERTIES),
        header_text_color: sheet.find(&HEADER_SELECTORS, &["color"]),
        footer_bg_color: sheet.find(&FOOTER_SELECTORS, BACKGROUND_PROPERTIES),
        footer_text_color: sheet.find(&FOOTER_SELECTORS, &["color"]),
    }
}

/// First element matching a single-tag selector.
fn first_element<'a>(document: &'a Html, tag: &str) -> Option<ElementRef<'a>> {
    let selector = ScraperSelector::parse(tag).ok()?;
    document.select(&selector).next()
}

fn contains_tag(element: ElementRef<'_>, tag: &str) -> bool {
    ScraperSelector::parse(tag).is_ok_and(|selector| element.select(&selector).next().is_some())
}

fn count_tag(element: ElementRef<'_>, tag: &str) -> usize {
    ScraperSelector::parse(tag).map_or(0, |selector| element.select(&selector).count())
}

/// True if any descendant carries a class containing `needle`, ignoring case.
fn has_class_like(element: ElementRef<'_>, needle: &str) -> bool {
    let Ok(selector) = ScraperSelector::parse("[class]") else {
        return false;
    };
    element.select(&selector).any(|child| {
        child
            .value()
            .attr("class")
            .is_some_and(|class| class.to_lowercase().contains(needle))
    })
}

fn classify_header(document: &Html) -> Option<&'static str> {
    let header = first_element(document, "header")?;
    let has_nav = contains_tag(header, "nav");
    let has_logo = contains_tag(header, "img") || has_class_like(header, "logo");

    match (has_logo, has_nav) {
        (true, true) => Some("Header with logo and navigation menu"),
        (true, false) => Some("Simple header with logo"),
        (false, true) => Some("Header with navigation menu"),
        (false, false) => None,
    }
}

fn classify_footer(document: &Html) -> Option<&'static str> {
    let footer = first_element(document, "footer")?;
    let text: String = footer.text().collect();
    let has_copyright = COPYRIGHT_REGEX.is_match(&text);
    let has_social = has_class_like(footer, "social");
    let has_links = count_tag(footer, "a") > 1;

    match (has_copyright, has_social, has_links) {
        (true, true, true) => {
            Some("Comprehensive footer with copyright, social links, and navigation")
        }
        (true, _, true) => Some("Standard footer with copyright and links"),
        (true, _, false) => Some("Simple footer with copyright"),
        (false, _, _) => None,
    }
}

/// Classifies a button `border-radius` value.
pub fn classify_button_radius(radius: &str) -> &'static str {
    if is_zero_length(radius) {
        return "Square buttons";
    }
    match px_value(radius) {
        Some(px) if px < BUTTON_SLIGHT_RADIUS_PX => "Slightly rounded buttons",
        Some(px) if px >= BUTTON_PILL_RADIUS_PX => "Pill-shaped buttons",
        _ => "Rounded buttons",
    }
}

fn extract_components(sheet: &Stylesheet, colors: &ColorSet, probe: &mut Probe) -> ComponentSet {
    let (button_style, button_properties) = extract_button(sheet, colors, probe);
    let (link_style, link_properties) = extract_link(sheet, colors, probe);
    let (card_style, card_properties) = extract_card(sheet, probe);

    ComponentSet {
        button_style,
        link_style,
        card_style,
        button_properties,
        link_properties,
        card_properties,
    }
}

fn extract_button(
    sheet: &Stylesheet,
    colors: &ColorSet,
    probe: &mut Probe,
) -> (String, ButtonProperties) {
    let hover_background_color = probe.or_default(
        "components.buttonProperties.hoverBackgroundColor",
        sheet.find(&BUTTON_HOVER_SELECTORS, BACKGROUND_PROPERTIES),
        profile::DEFAULT_BUTTON_HOVER_BG,
    );

    let Some(rule) = sheet.first_rule(&BUTTON_SELECTORS) else {
        let style = probe.or_default("components.buttonStyle", None, profile::DEFAULT_BUTTON_STYLE);
        let properties = ButtonProperties {
            background_color: colors.button.clone(),
            hover_background_color,
            ..ButtonProperties::default()
        };
        return (style, properties);
    };

    let radius = rule.value("border-radius");
    let mut style = radius
        .map_or("Rounded buttons", classify_button_radius)
        .to_owned();
    if rule.has("box-shadow") {
        style.push_str(" with shadow effect");
    }
    if rule.has("transition") || sheet.contains(":hover") {
        style.push_str(" and hover animation");
    }

    let properties = ButtonProperties {
        radius: probe.or_default(
            "components.buttonProperties.radius",
            radius.map(str::to_owned),
            profile::DEFAULT_RADIUS,
        ),
        padding: probe.or_default(
            "components.buttonProperties.padding",
            rule.value("padding").map(str::to_owned),
            profile::DEFAULT_BUTTON_PADDING,
        ),
        background_color: probe.or_default(
            "components.buttonProperties.backgroundColor",
            rule.value_of(BACKGROUND_PROPERTIES).map(str::to_owned),
            &colors.button,
        ),
        text_color: probe.or_default(
            "components.buttonProperties.textColor",
            rule.value("color").map(str::to_owned),
            profile::DEFAULT_BUTTON_TEXT_COLOR,
        ),
        hover_background_color,
    };

    (style, properties)
}

fn extract_link(sheet: &Stylesheet, colors: &ColorSet, probe: &mut Probe) -> (String, LinkProperties) {
    let hover_rule = sheet.first_rule(&LINK_HOVER_SELECTORS);
    let hover_decoration = probe.or_default(
        "components.linkProperties.hoverDecoration",
        hover_rule
            .and_then(|rule| rule.value("text-decoration"))
            .map(str::to_owned),
        profile::DEFAULT_LINK_DECORATION,
    );
    let hover_color = probe.or_default(
        "components.linkProperties.hoverColor",
        hover_rule
            .and_then(|rule| rule.value("color"))
            .map(str::to_owned),
        profile::DEFAULT_LINK_HOVER_COLOR,
    );

    let Some(rule) = sheet.first_rule(&LINK_SELECTORS) else {
        let style = probe.or_default("components.linkStyle", None, profile::DEFAULT_LINK_STYLE);
        let properties = LinkProperties {
            hover_decoration,
            color: colors.link.clone(),
            hover_color,
            ..LinkProperties::default()
        };
        return (style, properties);
    };

    let decoration = rule.value("text-decoration");
    let mut style = match decoration {
        Some(value) if value.contains("none") => "Non-underlined links",
        _ => "Underlined links",
    }
    .to_owned();
    if rule.has("transition") || hover_rule.is_some() {
        style.push_str(" with hover effect");
    }

    let properties = LinkProperties {
        decoration: probe.or_default(
            "components.linkProperties.decoration",
            decoration.map(str::to_owned),
            profile::DEFAULT_LINK_DECORATION,
        ),
        hover_decoration,
        color: probe.or_default(
            "components.linkProperties.color",
            rule.value("color").map(str::to_owned),
            &colors.link,
        ),
        hover_color,
    };

    (style, properties)
}

fn extract_card(sheet: &Stylesheet, probe: &mut Probe) -> (String, CardProperties) {
    let Some(rule) = sheet.first_rule(&CARD_SELECTORS) else {
        let style = probe.or_default("components.cardStyle", None, profile::DEFAULT_CARD_STYLE);
        return (style, CardProperties::default());
    };

    let has_border = rule.declarations().any(|(name, _)| {
        let name = name.to_ascii_lowercase();
        name == "border" || (name.starts_with("border-") && !name.contains("radius"))
    });
    let mut style = if has_border {
        "Bordered cards"
    } else if rule.has("box-shadow") {
        "Cards with shadow"
    } else {
        "Simple cards"
    }
    .to_owned();
    if rule.has("border-radius") {
        style.push_str(" with rounded corners");
    }
    if rule.has("padding") {
        style.push_str(" and internal padding");
    }

    let mut card_value = |field: &str, property: &str, default: &str| {
        probe.or_default(field, rule.value(property).map(str::to_owned), default)
    };
    let properties = CardProperties {
        padding: card_value("components.cardProperties.padding", "padding", profile::DEFAULT_CARD_PADDING),
        margin: card_value("components.cardProperties.margin", "margin", profile::DEFAULT_CARD_MARGIN),
        border: card_value("components.cardProperties.border", "border", profile::DEFAULT_CARD_BORDER),
        border_radius: card_value(
            "components.cardProperties.borderRadius",
            "border-radius",
            profile::DEFAULT_RADIUS,
        ),
        box_shadow: card_value(
            "components.cardProperties.boxShadow",
            "box-shadow",
            profile::DEFAULT_SHADOW,
        ),
    };

    (style, properties)
}
