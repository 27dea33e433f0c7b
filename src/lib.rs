//! The blogsmith library infers a website's visual style from its HTML and CSS,
//! synthesizes matching blog templates, formats generated posts and packages
//! the result as a self-contained static blog archive.

pub mod constants;
pub mod css;
pub mod extract;
pub mod format;
pub mod generate;
pub mod hosting;
pub mod package;
pub mod profile;
pub mod project;
pub mod storage;
pub mod synthesize;

/// Enum representing the visual theme applied on top of an extracted profile.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Theme {
    /// Render the extracted profile as-is
    #[default]
    Default,
    /// Dark background with accent-driven headings, links and buttons
    DarkGaming,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::DarkGaming => "dark-gaming",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "default" => Ok(Theme::Default),
            "dark-gaming" | "dark_gaming" => Ok(Theme::DarkGaming),
            _ => Err(format!("Invalid theme: {}", input)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Enum representing what a generated post is based on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PostSource {
    /// A free-text topic description.
    Topic(String),
    /// A page to fetch and use as inspiration.
    Url(String),
    /// Existing post content to improve.
    Existing(String),
}

pub use extract::{Extraction, extract};
pub use format::format_post;
pub use package::build_package;
pub use profile::StyleProfile;
pub use synthesize::synthesize;
