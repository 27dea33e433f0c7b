//! The package module assembles a project's templates, posts and hosted
//! assets into a self-contained ZIP archive:
//!
//! ```text
//! blog/blog.html
//! blog/posts/<id>.html
//! blog/assets/css/blog-styles.css
//! blog/assets/js/blog-scripts.js
//! blog/posts/.keep
//! blog/assets/images/.keep
//! README.md
//! ```
//!
//! Missing CSS and JS sources degrade to empty entries. A template without
//! its placeholder or markers is reported as a [`TemplateDefect`] and only
//! the affected post is left out.

use std::fmt;
use std::fs;
use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::constants::{
    BLOG_POSTS_PLACEHOLDER, CONTENT_MARKER, EXPORT_CSS_PATH, EXPORT_IMAGES_KEEP_PATH,
    EXPORT_INDEX_PATH, EXPORT_JS_PATH, EXPORT_POSTS_DIR, EXPORT_README_PATH,
    HOSTED_CSS_DIR, HOSTED_JS_DIR, META_DESCRIPTION_MARKER, POST_DATE_FORMATTED_MARKER,
    POST_DATE_MARKER, TITLE_MARKER,
};
use crate::format::escape_html;
use crate::hosting::HostedFiles;
use crate::storage::{Post, Project};
use crate::synthesize::Templates;

static MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-z_]+)\}\}").expect("Failed to compile MARKER regex"));

static STYLE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("Failed to compile STYLE_BLOCK regex")
});

const INDEX_CSS_REF: &str = "assets/css/blog-styles.css";
const INDEX_JS_REF: &str = "assets/js/blog-scripts.js";
const POST_CSS_REF: &str = "../assets/css/blog-styles.css";
const POST_JS_REF: &str = "../assets/js/blog-scripts.js";

/// Markers a post template must carry to render a complete page.
const REQUIRED_POST_MARKERS: [&str; 5] = [
    TITLE_MARKER,
    CONTENT_MARKER,
    POST_DATE_MARKER,
    POST_DATE_FORMATTED_MARKER,
    META_DESCRIPTION_MARKER,
];

/// A template that cannot be instantiated as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateDefect {
    /// The index template has no post list placeholder; it is exported without posts.
    MissingPlaceholder,
    /// The post template lacks a required marker; the post is left out.
    MissingMarker { post_id: i64, marker: &'static str },
}

impl fmt::Display for TemplateDefect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlaceholder => write!(
                formatter,
                "index template has no {BLOG_POSTS_PLACEHOLDER} placeholder"
            ),
            Self::MissingMarker { post_id, marker } => write!(
                formatter,
                "post template has no {marker} marker, post {post_id} skipped"
            ),
        }
    }
}

/// A built archive and the template defects found while building it.
#[derive(Debug)]
pub struct ExportPackage {
    pub bytes: Vec<u8>,
    pub defects: Vec<TemplateDefect>,
}

/// Builds the export archive for a project.
///
/// Output is deterministic for identical inputs and post order: entries are
/// written in a fixed order with a fixed timestamp.
///
/// # Arguments
///
/// * `project` - The project providing source file paths and hosted filenames
/// * `posts` - Posts to export, in the order their cards appear
/// * `templates` - The index and post templates to instantiate
/// * `hosting` - Hosted asset directory used to read and locate hosted files
///
/// # Returns
///
/// Returns the archive bytes and any template defects
///
/// # Errors
///
/// Returns an error if the archive cannot be written
pub fn build_package(
    project: &Project,
    posts: &[Post],
    templates: &Templates,
    hosting: &HostedFiles,
) -> Result<ExportPackage> {
    let mut defects = Vec::new();
    let hosted_urls = HostedUrls::new(project, hosting);

    let mut pages = Vec::new();
    let mut cards = String::new();
    for post in posts {
        match render_post(post, &templates.post) {
            Ok(html) => {
                cards.push_str(&post_card(post));
                pages.push((
                    format!("{EXPORT_POSTS_DIR}/{}.html", post.id),
                    hosted_urls.relocate(&html, POST_CSS_REF, POST_JS_REF),
                ));
            }
            Err(defect) => {
                warn!("Skipping post {}: {defect}", post.id);
                defects.push(defect);
            }
        }
    }

    if !templates.index.contains(BLOG_POSTS_PLACEHOLDER) {
        warn!("Exporting index without posts: {}", TemplateDefect::MissingPlaceholder);
        defects.push(TemplateDefect::MissingPlaceholder);
    }
    let index = templates.index.replacen(BLOG_POSTS_PLACEHOLDER, &cards, 1);
    let index = hosted_urls.relocate(&index, INDEX_CSS_REF, INDEX_JS_REF);

    let stylesheet = consolidated_stylesheet(project, hosting, &templates.index);
    let script = project
        .hosted_js_filename
        .as_deref()
        .map(|filename| hosting.read_js(filename))
        .unwrap_or_default();

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    add_entry(&mut archive, options, EXPORT_INDEX_PATH, &index)?;
    for (path, html) in &pages {
        add_entry(&mut archive, options, path, html)?;
    }
    add_entry(&mut archive, options, EXPORT_CSS_PATH, &stylesheet)?;
    add_entry(&mut archive, options, EXPORT_JS_PATH, &script)?;
    add_entry(&mut archive, options, &format!("{EXPORT_POSTS_DIR}/.keep"), "")?;
    add_entry(&mut archive, options, EXPORT_IMAGES_KEEP_PATH, "")?;
    add_entry(&mut archive, options, EXPORT_README_PATH, &readme(project, &hosted_urls))?;

    let bytes = archive
        .finish()
        .context("Unable to finish ZIP archive")?
        .into_inner();

    info!(
        "Packaged project {} with {} of {} posts ({} bytes)",
        project.id,
        pages.len(),
        posts.len(),
        bytes.len()
    );

    Ok(ExportPackage { bytes, defects })
}

fn add_entry(
    archive: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    path: &str,
    contents: &str,
) -> Result<()> {
    archive
        .start_file(path, options)
        .context(format!("Unable to add {path} to archive"))?;
    archive
        .write_all(contents.as_bytes())
        .context(format!("Unable to write {path} to archive"))?;
    Ok(())
}

/// Hosted assets of a project and the URLs they are currently served from.
struct HostedUrls {
    css_filename: Option<String>,
    js_filename: Option<String>,
    css: Option<String>,
    js: Option<String>,
}

impl HostedUrls {
    fn new(project: &Project, hosting: &HostedFiles) -> Self {
        let css_filename = project.hosted_css_filename.clone();
        let js_filename = project.hosted_js_filename.clone();
        Self {
            css: css_filename.as_deref().map(|filename| hosting.css_url(filename)),
            js: js_filename.as_deref().map(|filename| hosting.js_url(filename)),
            css_filename,
            js_filename,
        }
    }

    /// Replaces every hosted asset URL with the given relative path. Any host
    /// matches, since templates keep the base URL that was current at upload.
    fn relocate(&self, html: &str, css_ref: &str, js_ref: &str) -> String {
        let html = relocate_asset(html, HOSTED_CSS_DIR, self.css_filename.as_deref(), css_ref);
        relocate_asset(&html, HOSTED_JS_DIR, self.js_filename.as_deref(), js_ref)
    }
}

fn relocate_asset(html: &str, directory: &str, filename: Option<&str>, relative: &str) -> String {
    let Some(filename) = filename else {
        return html.to_owned();
    };
    let pattern = format!(
        r#"(?:https?:)?//[^\s"'<>]+/{}/{}"#,
        regex::escape(directory),
        regex::escape(filename)
    );
    match Regex::new(&pattern) {
        Ok(regex) => regex.replace_all(html, NoExpand(relative)).into_owned(),
        Err(e) => {
            warn!("Unable to match hosted URLs of {filename}: {e}");
            html.to_owned()
        }
    }
}

/// Stored full documents are reused verbatim; fragments are placed in the
/// post template.
fn render_post(post: &Post, template: &str) -> Result<String, TemplateDefect> {
    if post.html_content.contains("<html") {
        return Ok(post.html_content.clone());
    }

    if let Some(marker) = REQUIRED_POST_MARKERS
        .into_iter()
        .find(|marker| !template.contains(marker))
    {
        return Err(TemplateDefect::MissingMarker {
            post_id: post.id,
            marker,
        });
    }

    Ok(fill_post_template(template, post))
}

/// Substitutes every post marker in one pass, so marker-like text inside
/// the substituted values is left alone.
pub fn fill_post_template(template: &str, post: &Post) -> String {
    let title = escape_html(&post.title);
    let meta = escape_html(post.meta_description.as_deref().unwrap_or_default());
    let date = post.created_at.format("%Y-%m-%d").to_string();
    let formatted_date = post.created_at.format("%B %d, %Y").to_string();

    MARKER_REGEX
        .replace_all(template, |captures: &Captures<'_>| {
            match captures.get(1).map_or("", |name| name.as_str()) {
                "title" | "page_title" => title.clone(),
                "content" => post.html_content.clone(),
                "post_date" => date.clone(),
                "post_date_formatted" => formatted_date.clone(),
                "meta_description" => meta.clone(),
                _ => captures
                    .get(0)
                    .map_or_else(String::new, |whole| whole.as_str().to_owned()),
            }
        })
        .into_owned()
}

fn post_card(post: &Post) -> String {
    let description = post
        .meta_description
        .as_deref()
        .filter(|meta| !meta.is_empty())
        .map(|meta| format!("<p>{}</p>", escape_html(meta)))
        .unwrap_or_default();
    format!(
        "<div class=\"blog-post-card\"><h3><a href=\"posts/{}.html\">{}</a></h3>{description}</div>\n",
        post.id,
        escape_html(&post.title)
    )
}

/// Uploaded CSS, then hosted CSS unless it duplicates the upload, then the
/// index template's inline styles.
fn consolidated_stylesheet(project: &Project, hosting: &HostedFiles, index: &str) -> String {
    let uploaded = project
        .css_file_path
        .as_deref()
        .map(|path| {
            fs::read_to_string(path).unwrap_or_else(|e| {
                warn!("Uploaded stylesheet {path} is unavailable: {e}");
                String::new()
            })
        })
        .unwrap_or_default();
    let hosted = project
        .hosted_css_filename
        .as_deref()
        .map(|filename| hosting.read_css(filename))
        .unwrap_or_default();
    let inline: Vec<&str> = STYLE_BLOCK_REGEX
        .captures_iter(index)
        .filter_map(|captures| captures.get(1))
        .map(|block| block.as_str().trim())
        .collect();

    let mut parts = vec![uploaded.trim()];
    if hosted.trim() != uploaded.trim() {
        parts.push(hosted.trim());
    }
    parts.extend(inline);

    let parts: Vec<&str> = parts.into_iter().filter(|part| !part.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    format!("{}\n", parts.join("\n\n"))
}

fn readme(project: &Project, hosted_urls: &HostedUrls) -> String {
    let mut readme = format!(
        "# {} Blog\n\n\
         This package contains a blog for your website. Here's how to use it:\n\n\
         1. Upload the entire 'blog' folder to your website\n\
         2. The main blog page is at '{EXPORT_INDEX_PATH}'\n\
         3. Individual blog posts are in the '{EXPORT_POSTS_DIR}/' directory\n\
         4. Styles and scripts are bundled at '{EXPORT_CSS_PATH}' and '{EXPORT_JS_PATH}'\n",
        project.name
    );
    if hosted_urls.css.is_some() || hosted_urls.js.is_some() {
        readme.push_str("\nThe same assets are hosted at:\n");
        if let Some(css) = &hosted_urls.css {
            readme.push_str(&format!("   - CSS: {css}\n"));
        }
        if let Some(js) = &hosted_urls.js {
            readme.push_str(&format!("   - JS: {js}\n"));
        }
    }
    readme.push_str("\nAll references in the HTML files point to the bundled copies.\n\nEnjoy your new blog!\n");
    readme
}
