//! blogsmith is a CLI tool that infers a website's visual style from its HTML
//! and CSS, generates blog posts with an LLM and exports a static blog that
//! matches the site.
//!
//! Typical flow:
//! 1. `new` - Create a project
//! 2. `upload` - Extract the site's style and synthesize blog templates
//! 3. `post` - Generate a post from a topic or an inspiration URL
//! 4. `edit-css` - Optionally adjust the hosted stylesheet
//! 5. `export` - Package the blog as a ZIP archive

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use env_logger::Builder;
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use log::{LevelFilter, info};
use url::Url;

use blogsmith::{
    PostSource, Theme,
    constants::{DEFAULT_HOSTED_URL, MODEL_API_KEY_ENV_NAME},
    extract::extract_files,
    generate::{GenerateContext, build_rate_limiter},
    hosting::HostedFiles,
    project::{self, PostEdit, Upload},
    storage::Storage,
};

/// A CLI tool to generate a blog that matches an existing website
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute
    #[command(subcommand)]
    command: Command,

    /// Path to the project database
    #[arg(long, global = true, default_value = "blogsmith.db")]
    db: String,

    /// Directory holding the hosted stylesheets and scripts
    #[arg(long, global = true, default_value = "hosted_files")]
    hosted_dir: PathBuf,

    /// Public base URL the hosted directory is served from
    #[arg(long, global = true, default_value = DEFAULT_HOSTED_URL)]
    hosted_url: String,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

/// Settings for commands that talk to the model
#[derive(clap::Args)]
struct ModelArgs {
    /// Rate limit: requests per minute (default: no limit)
    #[arg(long, short = 'r')]
    rpm: Option<u32>,
    /// Timeout for a single model request in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new project and print its id
    New {
        /// Project name
        name: String,
        /// Free-text description
        #[arg(long, short)]
        description: Option<String>,
    },
    /// List projects and their posts
    List,
    /// Print the style profile extracted from a website as JSON
    Analyze {
        /// Path to the website's HTML file
        html: PathBuf,
        /// Path to the website's CSS file
        css: PathBuf,
    },
    /// Upload a website to a project and synthesize its blog templates
    Upload {
        /// Project id
        project: i64,
        /// Path to the website's HTML file
        html: PathBuf,
        /// Path to the website's CSS file
        css: PathBuf,
        /// What the website is for
        #[arg(long, short)]
        purpose: Option<String>,
        /// Theme: "default" or "dark-gaming"
        #[arg(long, short, default_value = "default")]
        theme: Theme,
        /// URL of the LLM model used to analyze the business behind the site
        #[arg(long, short)]
        model: Option<String>,
        #[command(flatten)]
        model_args: ModelArgs,
    },
    /// Generate a post with an LLM model
    #[command(group(ArgGroup::new("source").required(true).args(["topic", "url"])))]
    Post {
        /// Project id
        project: i64,
        /// URL of the LLM model to use for generation
        model: String,
        /// Use this title instead of generating one
        #[arg(long)]
        title: Option<String>,
        /// Topic to write about
        #[arg(long)]
        topic: Option<String>,
        /// Page to use as inspiration
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        model_args: ModelArgs,
    },
    /// Edit a post and re-format its content
    Edit {
        /// Post id
        post: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// Path to a file with the new raw content
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// New meta description
        #[arg(long)]
        meta: Option<String>,
    },
    /// Delete a post
    Delete {
        /// Post id
        post: i64,
    },
    /// Delete a project and all of its posts
    DeleteProject {
        /// Project id
        project: i64,
    },
    /// Replace a project's hosted stylesheet
    EditCss {
        /// Project id
        project: i64,
        /// Path to the new stylesheet
        css_file: PathBuf,
    },
    /// Export a project's blog as a ZIP archive
    Export {
        /// Project id
        project: i64,
        /// Path of the ZIP file to write
        output_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let hosting = HostedFiles::new(cli.hosted_dir, &cli.hosted_url);

    match cli.command {
        Command::New { name, description } => {
            let storage = Storage::new(&cli.db)?;
            let id = project::create_project(&storage, &name, description.as_deref())?;
            println!("{id}");
            Ok(())
        }
        Command::List => handle_list_command(&cli.db),
        Command::Analyze { html, css } => {
            let extraction = extract_files(&html, &css)?;
            println!("{}", serde_json::to_string_pretty(extraction.profile())?);
            Ok(())
        }
        Command::Upload {
            project,
            html,
            css,
            purpose,
            theme,
            model,
            model_args,
        } => {
            let upload = Upload {
                html_path: &html,
                css_path: &css,
                purpose: purpose.as_deref(),
                theme,
            };
            handle_upload_command(&cli.db, &hosting, project, &upload, model, &model_args).await
        }
        Command::Post {
            project,
            model,
            title,
            topic,
            url,
            model_args,
        } => {
            let source = match (topic, url) {
                (_, Some(url)) => PostSource::Url(url),
                (Some(topic), None) => PostSource::Topic(topic),
                (None, None) => anyhow::bail!("Specify --topic or --url"),
            };
            handle_post_command(&cli.db, project, &model, title.as_deref(), &source, &model_args)
                .await
        }
        Command::Edit {
            post,
            title,
            content_file,
            meta,
        } => handle_edit_command(&cli.db, post, title, content_file, meta),
        Command::Delete { post } => {
            let storage = Storage::new(&cli.db)?;
            project::delete_post(&storage, post)
        }
        Command::DeleteProject { project } => {
            let storage = Storage::new(&cli.db)?;
            project::delete_project(&storage, project)
        }
        Command::EditCss { project, css_file } => {
            handle_edit_css_command(&cli.db, &hosting, project, &css_file)
        }
        Command::Export {
            project,
            output_file,
        } => handle_export_command(&cli.db, &hosting, project, &output_file),
    }
}

fn handle_list_command(db: &str) -> Result<()> {
    let storage = Storage::new(db)?;
    for (project, posts) in project::list_projects(&storage)? {
        let status = if project.blog_template.is_some() {
            "templates ready"
        } else {
            "no upload yet"
        };
        println!("{}\t{}\t{}\t{status}", project.id, project.name, project.theme);
        for post in posts {
            println!(
                "\t{}\t{}\t{}",
                post.id,
                post.created_at.format("%Y-%m-%d"),
                post.title
            );
        }
    }
    Ok(())
}

fn handle_edit_command(
    db: &str,
    post_id: i64,
    title: Option<String>,
    content_file: Option<PathBuf>,
    meta: Option<String>,
) -> Result<()> {
    let content = match content_file {
        Some(file) => Some(
            fs::read_to_string(&file)
                .context(format!("Failed to read content file: {}", file.display()))?,
        ),
        None => None,
    };

    let storage = Storage::new(db)?;
    let edit = PostEdit {
        title,
        content,
        meta_description: meta,
    };
    project::edit_post(&storage, post_id, edit)?;
    Ok(())
}

fn handle_edit_css_command(
    db: &str,
    hosting: &HostedFiles,
    project_id: i64,
    css_file: &Path,
) -> Result<()> {
    let css = fs::read_to_string(css_file)
        .context(format!("Failed to read CSS file: {}", css_file.display()))?;

    let storage = Storage::new(db)?;
    let path = project::edit_hosted_css(&storage, hosting, project_id, &css)?;
    println!("{}", path.display());
    Ok(())
}

fn handle_export_command(
    db: &str,
    hosting: &HostedFiles,
    project_id: i64,
    output_file: &Path,
) -> Result<()> {
    let storage = Storage::new(db)?;
    let package = project::export_project(&storage, hosting, project_id, output_file)?;
    if !package.defects.is_empty() {
        println!(
            "Exported with {} template defect(s), see the log for details",
            package.defects.len()
        );
    }
    Ok(())
}

async fn handle_upload_command(
    db: &str,
    hosting: &HostedFiles,
    project_id: i64,
    upload: &Upload<'_>,
    model: Option<String>,
    model_args: &ModelArgs,
) -> Result<()> {
    let storage = Storage::new(db)?;

    let model = model.as_deref().map(build_model).transpose()?;
    let rate_limiter = build_rate_limiter(model_args.rpm);
    let http = reqwest::Client::new();
    let ctx = model.as_ref().map(|model| GenerateContext {
        model: model.as_ref(),
        rate_limiter: rate_limiter.as_ref(),
        timeout: Duration::from_secs(model_args.timeout),
        http: &http,
    });

    let extraction =
        project::upload_site(&storage, hosting, project_id, upload, ctx.as_ref()).await?;
    if extraction.is_degraded() {
        info!(
            "{} style fields were not found and use defaults (run with -vvv for details)",
            extraction.warnings().len()
        );
    }
    Ok(())
}

async fn handle_post_command(
    db: &str,
    project_id: i64,
    model: &str,
    title: Option<&str>,
    source: &PostSource,
    model_args: &ModelArgs,
) -> Result<()> {
    let storage = Storage::new(db)?;

    let model = build_model(model)?;
    let rate_limiter = build_rate_limiter(model_args.rpm);
    let http = reqwest::Client::new();
    let ctx = GenerateContext {
        model: model.as_ref(),
        rate_limiter: rate_limiter.as_ref(),
        timeout: Duration::from_secs(model_args.timeout),
        http: &http,
    };

    let id = project::create_post(&storage, &ctx, project_id, title, source).await?;
    println!("{id}");
    Ok(())
}

/// Builds a model from a `backend://model` URL, e.g. `ollama://llama3` or
/// `openai://gpt-4o-mini`. The API key is read from the environment.
fn build_model(model: &str) -> Result<Box<dyn LLMProvider>> {
    let model_url = Url::parse(model).map_err(|e| anyhow::anyhow!("Invalid model URL: {}", e))?;
    let llm_builder = LLMBuilder::new()
        .backend(
            LLMBackend::from_str(model_url.scheme())
                .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
        )
        .model(
            [
                model_url
                    .host_str()
                    .context("Specify model name as host URL.")?,
                model_url.username(),
            ]
            .iter()
            .filter(|x| !x.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(":"),
        );

    let llm_builder = match std::env::var(MODEL_API_KEY_ENV_NAME) {
        Ok(model_key) => {
            info!("API key is provided via {MODEL_API_KEY_ENV_NAME}");
            llm_builder.api_key(model_key)
        }
        Err(err) => {
            info!("{err} while providing api key");
            llm_builder
        }
    };

    llm_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))
}
