//! The generate module talks to the text model: it infers business context
//! from an uploaded site, writes post titles, bodies and meta descriptions,
//! and fetches inspiration pages.
//!
//! Every public generation function degrades to a fixed fallback value when
//! the model fails, times out or answers with nothing usable. The underlying
//! error is logged at warn level and never surfaces to the caller.

use std::time::Duration;

use anyhow::{Result, bail};
use dom_smoothie::{Article, CandidateSelectMode, Config, Readability, TextMode};
use llm::chat::{ChatMessage, ChatProvider};
use log::{debug, warn};
use once_cell::sync::Lazy;
use rate_guard::{RateLimit, StdTokenBucket, TokenBucketBuilder};
use regex::Regex;

use crate::PostSource;
use crate::constants::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SOURCE_CHARS, CONTENT_INSPIRATION_CHARS,
    CONTENT_PROMPT_TEMPLATE, FALLBACK_TITLE, INSPIRATION_FETCH_TIMEOUT_SECS,
    META_DESCRIPTION_LIMIT, META_PROMPT_TEMPLATE, THINK_STRIPPER, TITLE_INSPIRATION_CHARS,
    TITLE_PROMPT_TEMPLATE,
};
use crate::profile::BusinessInfo;

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Number of content characters passed to the meta description prompt.
const META_SUMMARY_CHARS: usize = 500;

/// Default timeout for a single model request.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration containing shared data for generation operations
pub struct GenerateContext<'a> {
    /// LLM model to generate with
    pub model: &'a dyn ChatProvider,
    /// Rate limiter for controlling request frequency
    pub rate_limiter: Option<&'a StdTokenBucket>,
    /// Upper bound for a single model request
    pub timeout: Duration,
    /// HTTP client used for inspiration URLs
    pub http: &'a reqwest::Client,
}

/// Body and meta description of a generated post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    pub content: String,
    pub meta_description: String,
}

/// Builds a token bucket allowing `rpm` requests per minute.
pub fn build_rate_limiter(rpm: Option<u32>) -> Option<StdTokenBucket> {
    rpm.and_then(|rpm| {
        let capacity = u64::from(rpm.max(1));
        let refill_interval = Duration::from_secs(60) / rpm.max(1);

        TokenBucketBuilder::builder()
            .capacity(capacity)
            .refill_amount(1_u64)
            .refill_every(refill_interval)
            .with_time(rate_guard::StdTimeSource::new())
            .with_precision::<rate_guard::Nanos>()
            .build()
            .ok()
    })
}

/// Removes `<think>` reasoning blocks and surrounding whitespace.
pub fn clean_response(response: &str) -> String {
    THINK_STRIPPER_REGEX
        .replace_all(response, "")
        .trim()
        .to_owned()
}

/// Removes one level of matching surrounding quotes.
pub fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|quote| text.strip_prefix(quote)?.strip_suffix(quote))
        .map_or(text, str::trim)
}

/// The first `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .map_or(text, |(end, _)| text.get(..end).unwrap_or(text))
}

/// Caps a meta description at the length search engines display.
pub fn truncate_meta(text: &str) -> String {
    if text.chars().count() <= META_DESCRIPTION_LIMIT {
        return text.to_owned();
    }
    format!("{}...", truncate_chars(text, META_DESCRIPTION_LIMIT - 3).trim_end())
}

/// Describes the website to the model.
pub fn website_info(business: Option<&BusinessInfo>, purpose: Option<&str>) -> String {
    let purpose = purpose.unwrap_or("a business website");
    match business {
        Some(business) => format!(
            "Website name: {}\nIndustry: {}\nTarget audience: {}\nPurpose: {}",
            business.name,
            business.industry,
            business.audience,
            if business.purpose.is_empty() {
                purpose
            } else {
                business.purpose.as_str()
            }
        ),
        None => format!("Purpose: {purpose}"),
    }
}

/// Sends a single prompt and returns the cleaned response.
///
/// # Errors
///
/// Returns an error if the model fails, times out or returns an empty answer.
async fn ask(ctx: &GenerateContext<'_>, prompt: String) -> Result<String> {
    let messages = [ChatMessage::user().content(prompt).build()];

    if let Some(limiter) = ctx.rate_limiter {
        while limiter.try_acquire(1).is_err() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    let response = tokio::time::timeout(ctx.timeout, ctx.model.chat(&messages))
        .await
        .map_err(|_| anyhow::anyhow!("LLM request timed out after {:?}", ctx.timeout))?
        .map_err(|err| anyhow::anyhow!("LLM error: {err}."))?
        .to_string();

    let cleaned = clean_response(&response);
    if cleaned.is_empty() {
        bail!("LLM returned an empty response");
    }
    Ok(cleaned)
}

/// Fetches a page and reduces it to readable text.
///
/// # Errors
///
/// Returns an error if the request fails, times out, answers with a status
/// other than 200, or the page has no readable content.
pub async fn fetch_inspiration(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(INSPIRATION_FETCH_TIMEOUT_SECS))
        .send()
        .await?;
    if response.status() != reqwest::StatusCode::OK {
        bail!("Unexpected status {} for {url}", response.status());
    }
    let html = response.text().await?;
    readable_text(&html)
}

/// Extracts the main readable text of an HTML page.
///
/// # Errors
///
/// Returns an error if no article content can be identified.
pub fn readable_text(html: &str) -> Result<String> {
    let config = Config {
        text_mode: TextMode::Markdown,
        candidate_select_mode: CandidateSelectMode::DomSmoothie,
        ..Default::default()
    };

    let mut readability = Readability::new(html, None, Some(config))?;
    let article: Article = readability.parse()?;
    Ok(article.text_content.to_string().trim().to_owned())
}

async fn source_context(ctx: &GenerateContext<'_>, source: &PostSource, limit: usize) -> String {
    match source {
        PostSource::Topic(topic) => format!("Topic: {topic}"),
        PostSource::Url(url) => match fetch_inspiration(ctx.http, url).await {
            Ok(text) => format!(
                "Inspiration from {url}:\n{}",
                truncate_chars(&text, limit)
            ),
            Err(e) => {
                warn!("Unable to fetch inspiration from {url}: {e}");
                format!(
                    "Unable to fetch content from URL: {url}. Write about the topic this URL suggests."
                )
            }
        },
        PostSource::Existing(content) => format!(
            "Existing content to improve:\n{}",
            truncate_chars(content, limit)
        ),
    }
}

/// Generates a post title.
///
/// # Arguments
///
/// * `ctx` - Model, rate limiter and timeout
/// * `source` - What the post is about
/// * `website` - Website description, see [`website_info`]
///
/// # Returns
///
/// Returns the title with surrounding quotes removed, or `"Blog Post"` if
/// generation fails
pub async fn generate_title(ctx: &GenerateContext<'_>, source: &PostSource, website: &str) -> String {
    let context = source_context(ctx, source, TITLE_INSPIRATION_CHARS).await;
    let prompt = TITLE_PROMPT_TEMPLATE
        .replace("{context}", &context)
        .replace("{website}", website);

    match ask(ctx, prompt).await {
        Ok(title) => {
            let title = strip_quotes(&title);
            if title.is_empty() {
                FALLBACK_TITLE.to_owned()
            } else {
                title.to_owned()
            }
        }
        Err(e) => {
            warn!("Title generation failed: {e}");
            FALLBACK_TITLE.to_owned()
        }
    }
}

/// Generates a post body and its meta description.
///
/// # Arguments
///
/// * `ctx` - Model, rate limiter and timeout
/// * `title` - The post title
/// * `source` - What the post is about
/// * `website` - Website description, see [`website_info`]
///
/// # Returns
///
/// Returns the generated content; failed parts are replaced by fallback text
pub async fn generate_content(
    ctx: &GenerateContext<'_>,
    title: &str,
    source: &PostSource,
    website: &str,
) -> GeneratedContent {
    let context = source_context(ctx, source, CONTENT_INSPIRATION_CHARS).await;
    let prompt = CONTENT_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{context}", &context)
        .replace("{website}", website);

    let content = match ask(ctx, prompt).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Content generation failed for '{title}': {e}");
            return GeneratedContent {
                content: format!(
                    "Failed to generate content for '{title}'. Please try again later."
                ),
                meta_description: fallback_meta(title),
            };
        }
    };

    let meta_description = generate_meta_description(ctx, title, &content).await;
    GeneratedContent {
        content,
        meta_description,
    }
}

fn fallback_meta(title: &str) -> String {
    truncate_meta(&format!("Blog post about {title}"))
}

/// Generates an SEO meta description of at most 160 characters.
pub async fn generate_meta_description(ctx: &GenerateContext<'_>, title: &str, content: &str) -> String {
    let prompt = META_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{summary}", truncate_chars(content, META_SUMMARY_CHARS));

    match ask(ctx, prompt).await {
        Ok(meta) => truncate_meta(strip_quotes(&meta)),
        Err(e) => {
            warn!("Meta description generation failed for '{title}': {e}");
            fallback_meta(title)
        }
    }
}

/// Asks the model for the business behind a website.
///
/// # Arguments
///
/// * `ctx` - Model, rate limiter and timeout
/// * `html` - Raw HTML of the uploaded site
/// * `css` - Raw CSS of the uploaded site
/// * `purpose` - Purpose stated by the user
///
/// # Returns
///
/// Returns the parsed business context, or [`BusinessInfo::fallback`] on any failure
pub async fn analyze_business(
    ctx: &GenerateContext<'_>,
    html: &str,
    css: &str,
    purpose: &str,
) -> BusinessInfo {
    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{html}", truncate_chars(html, ANALYSIS_SOURCE_CHARS))
        .replace("{css}", truncate_chars(css, ANALYSIS_SOURCE_CHARS))
        .replace("{purpose}", purpose);

    let parsed = ask(ctx, prompt)
        .await
        .and_then(|response| parse_business(&response));

    match parsed {
        Ok(mut business) => {
            if business.purpose.trim().is_empty() {
                business.purpose = purpose.to_owned();
            }
            debug!("Analyzed business: {business:?}");
            business
        }
        Err(e) => {
            warn!("Business analysis failed: {e}");
            BusinessInfo::fallback(purpose)
        }
    }
}

/// Parses the first JSON object in a model response, ignoring any
/// surrounding prose or code fences.
///
/// # Errors
///
/// Returns an error if the response holds no JSON object.
pub fn parse_business(response: &str) -> Result<BusinessInfo> {
    let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) else {
        bail!("No JSON object in response");
    };
    let json = response
        .get(start..=end)
        .ok_or_else(|| anyhow::anyhow!("No JSON object in response"))?;
    Ok(serde_json::from_str(json)?)
}
