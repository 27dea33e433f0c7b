//! The synthesize module renders a [`StyleProfile`] into the two reusable blog
//! templates: the blog index (with the post list placeholder) and the single
//! post page (with per-field substitution markers).
//!
//! Every profile value is exposed as a CSS custom property in an inline
//! `<style>` block; categorical component descriptions become class names on
//! the structural elements.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::Theme;
use crate::format::escape_html;
use crate::profile::{ColorSet, StyleProfile};

static SLOT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("Failed to compile SLOT regex"));

/// References to the hosted stylesheet and script, interpolated verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRefs {
    pub css_ref: String,
    pub js_ref: String,
}

/// Blog index and post page templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub index: String,
    pub post: String,
}

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{site_title}</title>
    <meta name="description" content="The official blog for {site_description}">
    <link rel="stylesheet" href="{css_ref}">
    <script src="{js_ref}" defer></script>
    <style>
{stylesheet}    </style>
</head>
<body class="{body_class}">
    <header class="blog-header {header_class}">
        <div class="container">
            <div class="blog-header-content">
                <h1 class="blog-title">{heading_text}</h1>
                <nav class="blog-nav">
                    <ul>
                        <li><a href="../index.html">Home</a></li>
                        <li><a href="blog.html" class="active">Blog</a></li>
                    </ul>
                </nav>
            </div>
        </div>
    </header>

    <main class="blog-main">
        <div class="container">
            <section class="blog-posts {posts_class}">
                <h2>Latest Posts</h2>

                <!-- BLOG_POSTS_PLACEHOLDER -->

            </section>
        </div>
    </main>

    <footer class="blog-footer {footer_class}">
        <div class="container">
            <p>&copy; {footer_text} - All rights reserved</p>
        </div>
    </footer>
</body>
</html>
"#;

const POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{page_title}} - {site_name}</title>
    <meta name="description" content="{{meta_description}}">
    <link rel="stylesheet" href="{css_ref}">
    <script src="{js_ref}" defer></script>
    <style>
{stylesheet}    </style>
</head>
<body class="{body_class}">
    <header class="blog-header {header_class}">
        <div class="container">
            <div class="blog-header-content">
                <h1 class="blog-title">{heading_text}</h1>
                <nav class="blog-nav">
                    <ul>
                        <li><a href="../../index.html">Home</a></li>
                        <li><a href="../blog.html">Blog</a></li>
                    </ul>
                </nav>
            </div>
        </div>
    </header>

    <main class="blog-main">
        <div class="container">
            <article class="blog-post">
                <header class="post-header">
                    <h1 class="post-title">{{title}}</h1>
                    <div class="post-meta">
                        <time datetime="{{post_date}}">{{post_date_formatted}}</time>
                    </div>
                </header>

                <div class="post-content {link_class}">
                    {{content}}
                </div>

                <div class="post-cta">
                    <h3>Ready to get started?</h3>
                    <p>Check out {cta_text} and see how we can help you.</p>
                    <a href="../../index.html" class="btn btn-primary {button_class}">Learn More</a>
                </div>
            </article>
        </div>
    </main>

    <footer class="blog-footer {footer_class}">
        <div class="container">
            <p>&copy; {footer_text} - All rights reserved</p>
        </div>
    </footer>
</body>
</html>
"#;

/// Rules shared by both templates; every value comes from the custom
/// properties declared in `:root`.
const BASE_RULES: &str = r#"        body {
            margin: 0;
            background: var(--color-background);
            color: var(--color-text);
            font-family: var(--font-body);
            font-size: var(--size-body);
            font-weight: var(--weight-body);
            font-style: var(--style-body);
            line-height: var(--line-height-body);
        }
        h1, h2, h3, h4 {
            color: var(--color-heading);
            font-family: var(--font-heading);
            font-weight: var(--weight-heading);
            font-style: var(--style-heading);
            line-height: var(--line-height-heading);
        }
        h1 { font-size: var(--size-h1); }
        h2 { font-size: var(--size-h2); }
        h3, h4 { font-size: var(--size-h3); }
        p { margin: 0 0 var(--paragraph-spacing); }
        a {
            color: var(--link-color);
            text-decoration: var(--link-decoration);
        }
        a:hover {
            color: var(--link-hover-color);
            text-decoration: var(--link-hover-decoration);
        }
        .container {
            max-width: var(--container-width);
            margin: 0 auto;
            padding: 0 var(--content-padding);
        }
        .blog-header {
            background: var(--header-bg);
            color: var(--header-text);
            padding: var(--spacing) 0;
        }
        .blog-header .blog-title, .blog-header a { color: var(--header-text); }
        .blog-header-content {
            display: flex;
            align-items: center;
            justify-content: space-between;
            flex-wrap: wrap;
        }
        .blog-nav ul {
            display: flex;
            gap: var(--spacing);
            list-style: none;
            margin: 0;
            padding: 0;
        }
        .blog-main section, .blog-main article { margin: var(--section-margin) 0; }
        .blog-post-card {
            padding: var(--card-padding);
            margin: var(--card-margin);
            background: var(--color-background);
        }
        .card-bordered .blog-post-card { border: var(--card-border); }
        .card-rounded .blog-post-card { border-radius: var(--card-radius); }
        .card-with-shadow .blog-post-card { box-shadow: var(--card-shadow); }
        .post-content a.plain, .post-content.plain a { text-decoration: none; }
        .post-content blockquote {
            border-left: 4px solid var(--color-accent);
            margin-left: 0;
            padding-left: var(--spacing);
        }
        .post-content pre {
            background: var(--color-border);
            border-radius: var(--radius);
            padding: var(--spacing);
            overflow-x: auto;
        }
        .post-cta {
            margin-top: var(--section-margin);
            padding: var(--card-padding);
            border-top: 1px solid var(--color-border);
        }
        .btn {
            display: inline-block;
            padding: var(--button-padding);
            border-radius: var(--button-radius);
            background: var(--button-bg);
            color: var(--button-text);
            text-decoration: none;
        }
        .btn:hover { background: var(--button-hover-bg); color: var(--button-text); }
        .btn.square { border-radius: 0; }
        .btn.pill { border-radius: 999px; }
        .btn.with-shadow { box-shadow: var(--shadow); }
        .btn.with-hover { transition: background 0.2s ease-in-out; }
        .blog-footer {
            background: var(--footer-bg);
            color: var(--footer-text);
            padding: var(--spacing) 0;
            text-align: center;
        }
"#;

/// Synthesizes the blog index and post templates for a profile.
///
/// The index template contains [`crate::constants::BLOG_POSTS_PLACEHOLDER`]
/// exactly once; the post template contains each post marker exactly once.
pub fn synthesize(profile: &StyleProfile, assets: &AssetRefs, theme: Theme) -> Templates {
    let colors = themed_colors(&profile.colors, theme);
    let stylesheet = render_stylesheet(profile, &colors, theme);

    let business_name = profile
        .business
        .as_ref()
        .map(|business| encode_braces(&escape_html(&business.name)))
        .filter(|name| !name.is_empty());

    let site_name = business_name.clone().unwrap_or_else(|| "Blog".to_owned());
    let slots: [(&str, String); 15] = [
        (
            "site_title",
            business_name
                .as_ref()
                .map_or_else(|| "Blog".to_owned(), |name| format!("{name} - Blog")),
        ),
        ("site_name", site_name),
        (
            "site_description",
            business_name.clone().unwrap_or_else(|| "our website".to_owned()),
        ),
        (
            "heading_text",
            format!("{} Blog", business_name.as_deref().unwrap_or("Our")),
        ),
        (
            "footer_text",
            business_name.clone().unwrap_or_else(|| "Website".to_owned()),
        ),
        (
            "cta_text",
            business_name.unwrap_or_else(|| "our website".to_owned()),
        ),
        ("css_ref", assets.css_ref.clone()),
        ("js_ref", assets.js_ref.clone()),
        ("stylesheet", stylesheet),
        ("body_class", format!("theme-{}", theme.as_str())),
        ("header_class", header_class(&profile.layout.header_style).to_owned()),
        ("footer_class", footer_class(&profile.layout.footer_style).to_owned()),
        ("posts_class", card_classes(&profile.components.card_style)),
        ("button_class", button_classes(&profile.components.button_style)),
        ("link_class", link_class(&profile.components.link_style).to_owned()),
    ];

    Templates {
        index: fill(INDEX_TEMPLATE, &slots),
        post: fill(POST_TEMPLATE, &slots),
    }
}

/// Replaces `{slot}` names in one pass. Unknown names, including the
/// `{{marker}}` tokens left for the package builder, are kept verbatim.
fn fill(template: &str, slots: &[(&str, String)]) -> String {
    SLOT_REGEX
        .replace_all(template, |captures: &Captures<'_>| {
            let whole = captures.get(0).map_or("", |found| found.as_str());
            let name = captures.get(1).map_or("", |found| found.as_str());
            slots
                .iter()
                .find(|(slot, _)| *slot == name)
                .map_or_else(|| whole.to_owned(), |(_, value)| value.clone())
        })
        .into_owned()
}

/// Model-provided text must not introduce `{{marker}}` tokens into a template.
fn encode_braces(text: &str) -> String {
    text.replace('{', "&#123;").replace('}', "&#125;")
}

/// Applies the theme's color overrides.
pub fn themed_colors(colors: &ColorSet, theme: Theme) -> ColorSet {
    match theme {
        Theme::Default => colors.clone(),
        Theme::DarkGaming => ColorSet {
            background: "#0d0d12".to_owned(),
            text: "#e4e4ef".to_owned(),
            heading: colors.accent.clone(),
            link: colors.accent.clone(),
            button: colors.accent.clone(),
            border: "#2a2a38".to_owned(),
            ..colors.clone()
        },
    }
}

fn render_stylesheet(profile: &StyleProfile, colors: &ColorSet, theme: Theme) -> String {
    let typography = &profile.typography;
    let layout = &profile.layout;
    let button = &profile.components.button_properties;
    let link = &profile.components.link_properties;
    let card = &profile.components.card_properties;

    let (header_bg, header_text, footer_bg, footer_text) = match theme {
        Theme::Default => (
            layout.header_bg_color.clone().unwrap_or_else(|| colors.background.clone()),
            layout.header_text_color.clone().unwrap_or_else(|| colors.heading.clone()),
            layout.footer_bg_color.clone().unwrap_or_else(|| colors.background.clone()),
            layout.footer_text_color.clone().unwrap_or_else(|| colors.text.clone()),
        ),
        Theme::DarkGaming => (
            "#15151d".to_owned(),
            colors.accent.clone(),
            "#15151d".to_owned(),
            colors.text.clone(),
        ),
    };
    let (button_bg, link_color) = match theme {
        Theme::Default => (button.background_color.clone(), link.color.clone()),
        Theme::DarkGaming => (colors.button.clone(), colors.link.clone()),
    };

    let mut properties: Vec<(String, String)> = [
        ("color-primary", colors.primary.clone()),
        ("color-secondary", colors.secondary.clone()),
        ("color-background", colors.background.clone()),
        ("color-text", colors.text.clone()),
        ("color-accent", colors.accent.clone()),
        ("color-button", colors.button.clone()),
        ("color-link", colors.link.clone()),
        ("color-heading", colors.heading.clone()),
        ("color-border", colors.border.clone()),
        ("font-heading", typography.heading_font.clone()),
        ("font-body", typography.body_font.clone()),
        ("size-h1", typography.heading_sizes.h1.clone()),
        ("size-h2", typography.heading_sizes.h2.clone()),
        ("size-h3", typography.heading_sizes.h3.clone()),
        ("size-body", typography.body_size.clone()),
        ("weight-heading", typography.heading_weight.clone()),
        ("weight-body", typography.body_weight.clone()),
        ("line-height-heading", typography.heading_line_height.clone()),
        ("line-height-body", typography.body_line_height.clone()),
        ("style-heading", typography.heading_style.clone()),
        ("style-body", typography.body_style.clone()),
        ("paragraph-spacing", typography.paragraph_spacing.clone()),
        ("container-width", layout.container_width.clone()),
        ("spacing", layout.spacing.clone()),
        ("content-padding", layout.content_padding.clone()),
        ("section-margin", layout.section_margin.clone()),
        ("radius", layout.border_radius.clone()),
        ("shadow", layout.box_shadow.clone()),
        ("header-bg", header_bg),
        ("header-text", header_text),
        ("footer-bg", footer_bg),
        ("footer-text", footer_text),
        ("button-radius", button.radius.clone()),
        ("button-padding", button.padding.clone()),
        ("button-bg", button_bg),
        ("button-text", button.text_color.clone()),
        ("button-hover-bg", button.hover_background_color.clone()),
        ("link-decoration", link.decoration.clone()),
        ("link-hover-decoration", link.hover_decoration.clone()),
        ("link-color", link_color),
        ("link-hover-color", link.hover_color.clone()),
        ("card-padding", card.padding.clone()),
        ("card-margin", card.margin.clone()),
        ("card-border", card.border.clone()),
        ("card-radius", card.border_radius.clone()),
        ("card-shadow", card.box_shadow.clone()),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_owned(), value))
    .collect();

    properties.extend(
        colors
            .palette
            .iter()
            .enumerate()
            .map(|(index, color)| (format!("color-palette-{}", index + 1), color.clone())),
    );

    let mut stylesheet = String::from("        :root {\n");
    for (name, value) in &properties {
        stylesheet.push_str(&format!("            --{name}: {};\n", css_value(value)));
    }
    stylesheet.push_str("        }\n");
    stylesheet.push_str(BASE_RULES);
    stylesheet
}

/// Keeps a raw profile value from closing the declaration or the style block.
fn css_value(value: &str) -> String {
    value
        .replace("</", "<\\/")
        .replace([';', '{', '}'], "")
        .trim()
        .to_owned()
}

fn header_class(header_style: &str) -> &'static str {
    let style = header_style.to_lowercase();
    if style.starts_with("simple") {
        return "header-simple";
    }
    match (style.contains("logo"), style.contains("navigation")) {
        (true, true) => "header-logo-nav",
        (true, false) => "header-logo",
        (false, true) => "header-nav",
        (false, false) => "header-simple",
    }
}

fn footer_class(footer_style: &str) -> &'static str {
    let style = footer_style.to_lowercase();
    if style.starts_with("comprehensive") {
        "footer-comprehensive"
    } else if style.starts_with("standard") {
        "footer-standard"
    } else if style.starts_with("simple") {
        "footer-simple"
    } else {
        "footer-basic"
    }
}

fn card_classes(card_style: &str) -> String {
    let style = card_style.to_lowercase();
    let mut classes = Vec::new();
    if style.contains("bordered") {
        classes.push("card-bordered");
    }
    if style.contains("shadow") {
        classes.push("card-with-shadow");
    }
    if style.contains("rounded") {
        classes.push("card-rounded");
    }
    if style.contains("padding") {
        classes.push("card-padded");
    }
    classes.join(" ")
}

fn button_classes(button_style: &str) -> String {
    let style = button_style.to_lowercase();
    let mut classes = Vec::new();
    if style.contains("square") {
        classes.push("square");
    } else if style.contains("pill") {
        classes.push("pill");
    } else if style.contains("slightly rounded") {
        classes.push("slightly-rounded");
    } else if style.contains("rounded") {
        classes.push("rounded");
    }
    if style.contains("shadow") {
        classes.push("with-shadow");
    }
    if style.contains("hover") {
        classes.push("with-hover");
    }
    classes.join(" ")
}

fn link_class(link_style: &str) -> &'static str {
    if link_style.to_lowercase().contains("non-underlined") {
        "plain"
    } else {
        "underlined"
    }
}
