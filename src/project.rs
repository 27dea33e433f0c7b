//! The project module ties the pipeline together for the CLI: creating
//! projects, uploading a website, generating and editing posts, and
//! exporting the finished blog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use log::{debug, info, warn};

use crate::constants::DEFAULT_BLOG_SCRIPT;
use crate::extract::{Extraction, extract};
use crate::format::format_post;
use crate::generate::{GenerateContext, analyze_business, generate_content, generate_title, website_info};
use crate::hosting::{HostedFiles, hosted_filenames};
use crate::package::{ExportPackage, build_package};
use crate::storage::{NewPost, Post, Project, Storage};
use crate::synthesize::{AssetRefs, Templates, synthesize};
use crate::{PostSource, Theme};

/// Website files and settings for an upload.
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub html_path: &'a Path,
    pub css_path: &'a Path,
    pub purpose: Option<&'a str>,
    pub theme: Theme,
}

/// Replacement values for a post; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub meta_description: Option<String>,
}

fn require_project(storage: &Storage, project_id: i64) -> Result<Project> {
    storage
        .get_project(project_id)?
        .with_context(|| format!("Project {project_id} not found"))
}

fn require_post(storage: &Storage, post_id: i64) -> Result<Post> {
    storage
        .get_post(post_id)?
        .with_context(|| format!("Post {post_id} not found"))
}

/// Creates an empty project.
///
/// # Errors
///
/// Returns an error if database operation fails
pub fn create_project(storage: &Storage, name: &str, description: Option<&str>) -> Result<i64> {
    let id = storage.create_project(name, description)?;
    info!("Created project {id} ({name})");
    Ok(id)
}

/// Every project with its posts.
///
/// # Errors
///
/// Returns an error if database operation fails
pub fn list_projects(storage: &Storage) -> Result<Vec<(Project, Vec<Post>)>> {
    storage
        .list_projects()?
        .into_iter()
        .map(|project| {
            let posts = storage.list_posts(project.id)?;
            Ok((project, posts))
        })
        .collect()
}

/// Deletes a project together with its posts. Hosted assets stay in place.
///
/// # Errors
///
/// Returns an error if the project does not exist or database operation fails
pub fn delete_project(storage: &Storage, project_id: i64) -> Result<()> {
    if !storage.delete_project(project_id)? {
        bail!("Project {project_id} not found");
    }
    info!("Deleted project {project_id} and its posts");
    Ok(())
}

/// Replaces the hosted stylesheet of a project. Templates keep linking the
/// same hosted URL, and exports bundle the new contents.
///
/// # Returns
///
/// Returns the path of the rewritten hosted file
///
/// # Errors
///
/// Returns an error if the project does not exist, has no hosted stylesheet
/// yet, or the file cannot be written
pub fn edit_hosted_css(
    storage: &Storage,
    hosting: &HostedFiles,
    project_id: i64,
    css: &str,
) -> Result<PathBuf> {
    let project = require_project(storage, project_id)?;
    let Some(filename) = project.hosted_css_filename else {
        bail!("Project {project_id} has no hosted stylesheet, upload a website first");
    };

    let path = hosting.publish_css(&filename, css)?;
    info!("Replaced hosted stylesheet {filename} of project {project_id}");
    Ok(path)
}

/// Extracts the style of an uploaded website, publishes its hosted assets
/// and stores freshly synthesized templates, replacing earlier ones.
///
/// With a model, the profile is enriched with the business behind the site.
///
/// # Arguments
///
/// * `storage` - Project store
/// * `hosting` - Hosted asset directory
/// * `project_id` - The project to upload to
/// * `upload` - Website files, purpose and theme
/// * `ctx` - Optional model context for business analysis
///
/// # Returns
///
/// Returns the extraction outcome so callers can report defaulted fields
///
/// # Errors
///
/// Returns an error if:
/// * The project does not exist
/// * The website files cannot be read
/// * Hosted assets cannot be written
/// * Database operations fail
pub async fn upload_site(
    storage: &Storage,
    hosting: &HostedFiles,
    project_id: i64,
    upload: &Upload<'_>,
    ctx: Option<&GenerateContext<'_>>,
) -> Result<Extraction> {
    let mut project = require_project(storage, project_id)?;

    let html = fs::read_to_string(upload.html_path)
        .context(format!("Failed to read HTML file: {}", upload.html_path.display()))?;
    let css = fs::read_to_string(upload.css_path)
        .context(format!("Failed to read CSS file: {}", upload.css_path.display()))?;

    let extraction = extract(&html, &css);
    for warning in extraction.warnings() {
        debug!("{warning}");
    }
    info!(
        "Extracted style profile for project {project_id} ({} fields defaulted)",
        extraction.warnings().len()
    );

    let mut profile = extraction.profile().clone();
    if let Some(ctx) = ctx {
        let business = analyze_business(ctx, &html, &css, upload.purpose.unwrap_or_default()).await;
        profile = profile.with_business(business);
    }

    let (css_filename, js_filename) = hosted_filenames(project_id, Utc::now().timestamp());
    hosting.publish_css(&css_filename, &css)?;
    hosting.publish_js(&js_filename, DEFAULT_BLOG_SCRIPT)?;

    let assets = AssetRefs {
        css_ref: hosting.css_url(&css_filename),
        js_ref: hosting.js_url(&js_filename),
    };
    let templates = synthesize(&profile, &assets, upload.theme);

    project.website_purpose = upload.purpose.map(str::to_owned);
    project.html_file_path = Some(upload.html_path.display().to_string());
    project.css_file_path = Some(upload.css_path.display().to_string());
    project.hosted_css_filename = Some(css_filename);
    project.hosted_js_filename = Some(js_filename);
    project.style_profile = Some(profile);
    project.theme = upload.theme;
    project.blog_template = Some(templates.index);
    project.post_template = Some(templates.post);
    storage.update_project(&project)?;

    info!("Stored {} templates for project {project_id}", upload.theme);
    Ok(extraction)
}

/// Generates, formats and stores a new post.
///
/// # Arguments
///
/// * `storage` - Project store
/// * `ctx` - Model context
/// * `project_id` - The project to add the post to
/// * `title` - Fixed title; generated from `source` when absent
/// * `source` - What the post is about
///
/// # Returns
///
/// Returns the id of the new post
///
/// # Errors
///
/// Returns an error if the project does not exist or database operation fails.
/// Model failures do not fail the operation; they produce fallback text.
pub async fn create_post(
    storage: &Storage,
    ctx: &GenerateContext<'_>,
    project_id: i64,
    title: Option<&str>,
    source: &PostSource,
) -> Result<i64> {
    let project = require_project(storage, project_id)?;
    let website = website_info(
        project
            .style_profile
            .as_ref()
            .and_then(|profile| profile.business.as_ref()),
        project.website_purpose.as_deref(),
    );

    let title = match title {
        Some(title) => title.to_owned(),
        None => generate_title(ctx, source, &website).await,
    };
    let generated = generate_content(ctx, &title, source, &website).await;

    let post = NewPost {
        project_id,
        html_content: format_post(&generated.content),
        raw_content: generated.content,
        meta_description: Some(generated.meta_description),
        title,
    };
    let id = storage.insert_post(&post)?;
    info!("Created post {id} '{}' in project {project_id}", post.title);
    Ok(id)
}

/// Replaces post fields and re-formats the stored content.
///
/// # Errors
///
/// Returns an error if the post does not exist or database operation fails
pub fn edit_post(storage: &Storage, post_id: i64, edit: PostEdit) -> Result<Post> {
    let mut post = require_post(storage, post_id)?;

    if let Some(title) = edit.title {
        post.title = title;
    }
    if let Some(content) = edit.content {
        post.raw_content = content;
    }
    if let Some(meta_description) = edit.meta_description {
        post.meta_description = Some(meta_description);
    }
    post.html_content = format_post(&post.raw_content);

    storage.update_post(&post)?;
    info!("Updated post {post_id}");
    Ok(post)
}

/// Deletes a post.
///
/// # Errors
///
/// Returns an error if the post does not exist or database operation fails
pub fn delete_post(storage: &Storage, post_id: i64) -> Result<()> {
    if !storage.delete_post(post_id)? {
        bail!("Post {post_id} not found");
    }
    info!("Deleted post {post_id}");
    Ok(())
}

/// Exports a project's blog as a ZIP archive at `output_path`.
///
/// # Returns
///
/// Returns the written package, including any template defects
///
/// # Errors
///
/// Returns an error if:
/// * The project does not exist or has no templates yet
/// * The archive cannot be built or written
/// * Database operations fail
pub fn export_project(
    storage: &Storage,
    hosting: &HostedFiles,
    project_id: i64,
    output_path: &Path,
) -> Result<ExportPackage> {
    let project = require_project(storage, project_id)?;
    let (Some(index), Some(post)) = (project.blog_template.clone(), project.post_template.clone())
    else {
        bail!("Project {project_id} has no templates, upload a website first");
    };

    let posts = storage.list_posts(project_id)?;
    let package = build_package(&project, &posts, &Templates { index, post }, hosting)?;

    fs::write(output_path, &package.bytes)
        .context(format!("Failed to write package: {}", output_path.display()))?;

    for defect in &package.defects {
        warn!("Template defect in project {project_id}: {defect}");
    }
    info!(
        "Exported project {project_id} to {}",
        output_path.display()
    );
    Ok(package)
}
