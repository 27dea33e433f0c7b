//! The profile module holds the structured style summary inferred from an
//! uploaded website, together with the fixed defaults shared by the extractor
//! and the template synthesizer.
//!
//! Profiles serialize to a nested camelCase JSON blob. Every struct carries
//! `#[serde(default)]` so a blob with missing keys comes back filled with the
//! same defaults the extractor falls back to.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIMARY: &str = "#007bff";
pub const DEFAULT_SECONDARY: &str = "#6c757d";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_TEXT: &str = "#333333";
pub const DEFAULT_ACCENT: &str = "#17a2b8";
pub const DEFAULT_BORDER: &str = "#dee2e6";

pub const DEFAULT_FONT: &str = "sans-serif";
pub const DEFAULT_H1_SIZE: &str = "2rem";
pub const DEFAULT_H2_SIZE: &str = "1.75rem";
pub const DEFAULT_H3_SIZE: &str = "1.5rem";
pub const DEFAULT_BODY_SIZE: &str = "1rem";
pub const DEFAULT_HEADING_WEIGHT: &str = "bold";
pub const DEFAULT_BODY_WEIGHT: &str = "normal";
pub const DEFAULT_HEADING_LINE_HEIGHT: &str = "1.2";
pub const DEFAULT_BODY_LINE_HEIGHT: &str = "1.6";
pub const DEFAULT_FONT_STYLE: &str = "normal";
pub const DEFAULT_PARAGRAPH_SPACING: &str = "1rem";

pub const DEFAULT_CONTAINER_WIDTH: &str = "1200px";
pub const DEFAULT_SPACING: &str = "1rem";
pub const DEFAULT_CONTENT_PADDING: &str = "15px";
pub const DEFAULT_SECTION_MARGIN: &str = "2rem";
pub const DEFAULT_RADIUS: &str = "4px";
pub const DEFAULT_SHADOW: &str = "0 2px 4px rgba(0,0,0,0.05)";
pub const DEFAULT_HEADER_STYLE: &str = "Simple header with logo and navigation";
pub const DEFAULT_FOOTER_STYLE: &str = "Basic footer with copyright information";

pub const DEFAULT_BUTTON_STYLE: &str = "Standard rounded buttons with hover effect";
pub const DEFAULT_LINK_STYLE: &str = "Underlined links with color change on hover";
pub const DEFAULT_CARD_STYLE: &str = "Simple bordered cards with padding";
pub const DEFAULT_BUTTON_PADDING: &str = "0.5rem 1rem";
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_BUTTON_HOVER_BG: &str = "#0069d9";
pub const DEFAULT_LINK_DECORATION: &str = "underline";
pub const DEFAULT_LINK_HOVER_COLOR: &str = "#0056b3";
pub const DEFAULT_CARD_PADDING: &str = "1rem";
pub const DEFAULT_CARD_MARGIN: &str = "1rem 0";
pub const DEFAULT_CARD_BORDER: &str = "1px solid #dee2e6";

/// Structured summary of a website's visual design.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleProfile {
    pub colors: ColorSet,
    pub typography: TypographySet,
    pub layout: LayoutSet,
    pub components: ComponentSet,
    /// Business context inferred by the text model, absent when no model was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessInfo>,
}

impl StyleProfile {
    /// Returns the profile with the given business context attached.
    pub fn with_business(mut self, business: BusinessInfo) -> Self {
        self.business = Some(business);
        self
    }
}

/// Role-specific colors plus the frequency-ranked palette. Values are raw CSS
/// tokens as found in the source stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorSet {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
    pub accent: String,
    pub button: String,
    pub link: String,
    pub heading: String,
    pub border: String,
    /// Distinct colors, most frequent first.
    pub palette: Vec<String>,
}

impl Default for ColorSet {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_owned(),
            secondary: DEFAULT_SECONDARY.to_owned(),
            background: DEFAULT_BACKGROUND.to_owned(),
            text: DEFAULT_TEXT.to_owned(),
            accent: DEFAULT_ACCENT.to_owned(),
            button: DEFAULT_PRIMARY.to_owned(),
            link: DEFAULT_PRIMARY.to_owned(),
            heading: DEFAULT_PRIMARY.to_owned(),
            border: DEFAULT_BORDER.to_owned(),
            palette: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypographySet {
    pub heading_font: String,
    pub body_font: String,
    pub heading_sizes: HeadingSizes,
    pub body_size: String,
    pub heading_weight: String,
    pub body_weight: String,
    pub heading_line_height: String,
    pub body_line_height: String,
    pub heading_style: String,
    pub body_style: String,
    pub paragraph_spacing: String,
}

impl Default for TypographySet {
    fn default() -> Self {
        Self {
            heading_font: DEFAULT_FONT.to_owned(),
            body_font: DEFAULT_FONT.to_owned(),
            heading_sizes: HeadingSizes::default(),
            body_size: DEFAULT_BODY_SIZE.to_owned(),
            heading_weight: DEFAULT_HEADING_WEIGHT.to_owned(),
            body_weight: DEFAULT_BODY_WEIGHT.to_owned(),
            heading_line_height: DEFAULT_HEADING_LINE_HEIGHT.to_owned(),
            body_line_height: DEFAULT_BODY_LINE_HEIGHT.to_owned(),
            heading_style: DEFAULT_FONT_STYLE.to_owned(),
            body_style: DEFAULT_FONT_STYLE.to_owned(),
            paragraph_spacing: DEFAULT_PARAGRAPH_SPACING.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingSizes {
    pub h1: String,
    pub h2: String,
    pub h3: String,
}

impl Default for HeadingSizes {
    fn default() -> Self {
        Self {
            h1: DEFAULT_H1_SIZE.to_owned(),
            h2: DEFAULT_H2_SIZE.to_owned(),
            h3: DEFAULT_H3_SIZE.to_owned(),
        }
    }
}

/// Page structure. Header and footer colors stay `None` when the stylesheet
/// has no header/footer rule; the synthesizer then derives them from the
/// color set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSet {
    pub container_width: String,
    pub spacing: String,
    pub header_style: String,
    pub footer_style: String,
    pub content_padding: String,
    pub section_margin: String,
    pub border_radius: String,
    pub box_shadow: String,
    pub header_bg_color: Option<String>,
    pub header_text_color: Option<String>,
    pub footer_bg_color: Option<String>,
    pub footer_text_color: Option<String>,
}

impl Default for LayoutSet {
    fn default() -> Self {
        Self {
            container_width: DEFAULT_CONTAINER_WIDTH.to_owned(),
            spacing: DEFAULT_SPACING.to_owned(),
            header_style: DEFAULT_HEADER_STYLE.to_owned(),
            footer_style: DEFAULT_FOOTER_STYLE.to_owned(),
            content_padding: DEFAULT_CONTENT_PADDING.to_owned(),
            section_margin: DEFAULT_SECTION_MARGIN.to_owned(),
            border_radius: DEFAULT_RADIUS.to_owned(),
            box_shadow: DEFAULT_SHADOW.to_owned(),
            header_bg_color: None,
            header_text_color: None,
            footer_bg_color: None,
            footer_text_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentSet {
    pub button_style: String,
    pub link_style: String,
    pub card_style: String,
    pub button_properties: ButtonProperties,
    pub link_properties: LinkProperties,
    pub card_properties: CardProperties,
}

impl Default for ComponentSet {
    fn default() -> Self {
        Self {
            button_style: DEFAULT_BUTTON_STYLE.to_owned(),
            link_style: DEFAULT_LINK_STYLE.to_owned(),
            card_style: DEFAULT_CARD_STYLE.to_owned(),
            button_properties: ButtonProperties::default(),
            link_properties: LinkProperties::default(),
            card_properties: CardProperties::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonProperties {
    pub radius: String,
    pub padding: String,
    pub background_color: String,
    pub text_color: String,
    pub hover_background_color: String,
}

impl Default for ButtonProperties {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS.to_owned(),
            padding: DEFAULT_BUTTON_PADDING.to_owned(),
            background_color: DEFAULT_PRIMARY.to_owned(),
            text_color: DEFAULT_BUTTON_TEXT_COLOR.to_owned(),
            hover_background_color: DEFAULT_BUTTON_HOVER_BG.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkProperties {
    pub decoration: String,
    pub hover_decoration: String,
    pub color: String,
    pub hover_color: String,
}

impl Default for LinkProperties {
    fn default() -> Self {
        Self {
            decoration: DEFAULT_LINK_DECORATION.to_owned(),
            hover_decoration: DEFAULT_LINK_DECORATION.to_owned(),
            color: DEFAULT_PRIMARY.to_owned(),
            hover_color: DEFAULT_LINK_HOVER_COLOR.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardProperties {
    pub padding: String,
    pub margin: String,
    pub border: String,
    pub border_radius: String,
    pub box_shadow: String,
}

impl Default for CardProperties {
    fn default() -> Self {
        Self {
            padding: DEFAULT_CARD_PADDING.to_owned(),
            margin: DEFAULT_CARD_MARGIN.to_owned(),
            border: DEFAULT_CARD_BORDER.to_owned(),
            border_radius: DEFAULT_RADIUS.to_owned(),
            box_shadow: DEFAULT_SHADOW.to_owned(),
        }
    }
}

/// Business context of the uploaded website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInfo {
    pub name: String,
    pub industry: String,
    pub audience: String,
    pub purpose: String,
}

impl BusinessInfo {
    /// Business context used when the text model cannot provide one.
    pub fn fallback(purpose: &str) -> Self {
        Self {
            name: "Website".to_owned(),
            industry: "Technology".to_owned(),
            audience: "Developers".to_owned(),
            purpose: purpose.to_owned(),
        }
    }
}

impl Default for BusinessInfo {
    fn default() -> Self {
        Self::fallback("")
    }
}
