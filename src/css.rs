//! The css module provides a deliberately small, first-match scanner over
//! stylesheet text. It is not a CSS parser: there is no cascade and no
//! specificity, and the first rule block (in source order) that satisfies a
//! probe wins. Nested at-rules are flattened because only innermost
//! `selector { declarations }` pairs are visited.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("Failed to compile COMMENT regex"));

static RULE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^{}]*)\{([^{}]*)\}").expect("Failed to compile RULE regex"));

static COLOR_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#[0-9a-fA-F]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)|\b[a-zA-Z]+\b")
        .expect("Failed to compile COLOR_TOKEN regex")
});

static PX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)px").expect("Failed to compile PX regex"));

const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise", "darkviolet", "deeppink",
    "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite", "forestgreen",
    "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow",
    "grey", "honeydew", "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender",
    "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink", "lightsalmon",
    "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple", "rebeccapurple",
    "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen",
    "seashell", "sienna", "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow",
    "springgreen", "steelblue", "tan", "teal", "thistle", "tomato", "turquoise", "violet",
    "wheat", "white", "whitesmoke", "yellow", "yellowgreen",
];

/// Stylesheet text with comments removed.
#[derive(Debug)]
pub struct Stylesheet {
    text: String,
}

/// A single `selectors { body }` pair.
#[derive(Debug, Clone, Copy)]
pub struct RuleBlock<'a> {
    pub selectors: &'a str,
    pub body: &'a str,
}

/// Matches a rule's selector list against a fixed set of selector
/// alternatives. A selector matches when it ends with one of the
/// alternatives as a whole compound (`.nav a` matches `a`, `.data` does not).
#[derive(Debug)]
pub struct SelectorPattern {
    regex: Regex,
}

impl SelectorPattern {
    /// Builds a pattern from literal selector alternatives.
    ///
    /// # Panics
    ///
    /// Panics if the escaped alternatives fail to compile, which cannot
    /// happen for literal input.
    pub fn new(alternatives: &[&str]) -> Self {
        let alternatives: Vec<String> = alternatives.iter().map(|alt| regex::escape(alt)).collect();
        let regex = Regex::new(&format!(r"(?:^|[\s>+~])(?:{})$", alternatives.join("|")))
            .expect("Failed to compile selector pattern");
        Self { regex }
    }

    /// Returns true if any selector in the comma separated list matches.
    pub fn matches(&self, selectors: &str) -> bool {
        selectors
            .split(',')
            .map(str::trim)
            .any(|selector| self.regex.is_match(selector))
    }
}

impl Stylesheet {
    pub fn parse(css: &str) -> Self {
        Self {
            text: COMMENT_REGEX.replace_all(css, "").into_owned(),
        }
    }

    /// Iterates rule blocks in source order.
    pub fn rules(&self) -> impl Iterator<Item = RuleBlock<'_>> {
        RULE_REGEX.captures_iter(&self.text).filter_map(|captures| {
            Some(RuleBlock {
                selectors: captures.get(1)?.as_str().trim(),
                body: captures.get(2)?.as_str(),
            })
        })
    }

    /// First rule whose selector list matches `pattern`.
    pub fn first_rule(&self, pattern: &SelectorPattern) -> Option<RuleBlock<'_>> {
        self.rules().find(|rule| pattern.matches(rule.selectors))
    }

    /// Value of the first declaration of one of `properties` inside the first
    /// matching rule that declares it.
    pub fn find(&self, pattern: &SelectorPattern, properties: &[&str]) -> Option<String> {
        self.rules()
            .filter(|rule| pattern.matches(rule.selectors))
            .find_map(|rule| rule.value_of(properties))
            .map(str::to_owned)
    }

    /// Values of every declaration of one of `properties`, in source order,
    /// regardless of selector.
    pub fn values<'a>(&'a self, properties: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.rules().flat_map(move |rule| {
            rule.declarations()
                .filter(move |(name, _)| properties.iter().any(|p| name.eq_ignore_ascii_case(p)))
                .map(|(_, value)| value)
        })
    }

    /// Plain substring search over the whole stylesheet.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

impl<'a> RuleBlock<'a> {
    /// Iterates `(property, value)` pairs with surrounding whitespace trimmed.
    pub fn declarations(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.body.split(';').filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty() && !value.is_empty()).then_some((name, value))
        })
    }

    pub fn value_of(self, properties: &[&str]) -> Option<&'a str> {
        self.declarations()
            .find(|(name, _)| properties.iter().any(|p| name.eq_ignore_ascii_case(p)))
            .map(|(_, value)| value)
    }

    pub fn value(self, property: &str) -> Option<&'a str> {
        self.value_of(&[property])
    }

    pub fn has(self, property: &str) -> bool {
        self.value(property).is_some()
    }
}

/// First color token in a declaration value: a hex code, an `rgb[a]()` or
/// `hsl[a]()` function, or a CSS named color.
pub fn color_token(value: &str) -> Option<&str> {
    COLOR_TOKEN_REGEX
        .find_iter(value)
        .map(|found| found.as_str())
        .find(|token| {
            token.starts_with('#')
                || token.contains('(')
                || NAMED_COLORS.contains(&token.to_ascii_lowercase().as_str())
        })
}

/// Pixel amount of the first `<n>px` in the value.
pub fn px_value(value: &str) -> Option<f64> {
    PX_REGEX
        .captures(value)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().parse().ok())
}

/// True if the value is a literal zero length (`0`, `0px`, `0rem`, `0 0` ...).
pub fn is_zero_length(value: &str) -> bool {
    let mut parts = value.split_whitespace().peekable();
    parts.peek().is_some()
        && parts.all(|part| {
            let unit = part.trim_start_matches(['0', '.']);
            part.starts_with('0') && unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%')
        })
}
