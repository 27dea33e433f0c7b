pub const MODEL_API_KEY_ENV_NAME: &str = "BLOGSMITH_MODEL_API_KEY";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

/// Marker replaced with the rendered post cards in the index template.
pub const BLOG_POSTS_PLACEHOLDER: &str = "<!-- BLOG_POSTS_PLACEHOLDER -->";

pub const TITLE_MARKER: &str = "{{title}}";
pub const PAGE_TITLE_MARKER: &str = "{{page_title}}";
pub const CONTENT_MARKER: &str = "{{content}}";
pub const POST_DATE_MARKER: &str = "{{post_date}}";
pub const POST_DATE_FORMATTED_MARKER: &str = "{{post_date_formatted}}";
pub const META_DESCRIPTION_MARKER: &str = "{{meta_description}}";

pub const DEFAULT_HOSTED_URL: &str = "https://ourdomain.com";
pub const HOSTED_CSS_DIR: &str = "cssstyles";
pub const HOSTED_JS_DIR: &str = "scripts";

pub const EXPORT_INDEX_PATH: &str = "blog/blog.html";
pub const EXPORT_POSTS_DIR: &str = "blog/posts";
pub const EXPORT_CSS_PATH: &str = "blog/assets/css/blog-styles.css";
pub const EXPORT_JS_PATH: &str = "blog/assets/js/blog-scripts.js";
pub const EXPORT_IMAGES_KEEP_PATH: &str = "blog/assets/images/.keep";
pub const EXPORT_README_PATH: &str = "README.md";

pub const FALLBACK_TITLE: &str = "Blog Post";
pub const META_DESCRIPTION_LIMIT: usize = 160;
pub const INSPIRATION_FETCH_TIMEOUT_SECS: u64 = 10;
pub const TITLE_INSPIRATION_CHARS: usize = 3000;
pub const CONTENT_INSPIRATION_CHARS: usize = 5000;
pub const ANALYSIS_SOURCE_CHARS: usize = 15000;

pub(crate) const TITLE_PROMPT_TEMPLATE: &str = r#"
You are a professional blog title generator with expertise in SEO and content marketing.
Generate an engaging, compelling, and SEO-friendly title for a blog post on the following:

CONTEXT INFORMATION:
{context}

WEBSITE INFORMATION:
{website}

The title should be attention-grabbing, clear, optimized for search engines,
between 50 and 70 characters, and relevant to the website's industry and audience.
Return only the title text, nothing else."#;

pub(crate) const CONTENT_PROMPT_TEMPLATE: &str = r#"
You are a professional blog content writer creating content that matches a website's style and purpose.
Write a high-quality blog post with the following title:

TITLE: {title}

CONTEXT INFORMATION:
{context}

WEBSITE INFORMATION:
{website}

Write in a professional but engaging tone, reference the website or product where it fits,
end with a call-to-action that directs readers to the main website, and structure the post
with markdown headings (#, ##, ###), paragraphs, and bullet points where appropriate.
Aim for approximately 800-1000 words."#;

pub(crate) const META_PROMPT_TEMPLATE: &str = r#"
You are an SEO specialist creating meta descriptions.
Generate an SEO-friendly meta description for this blog post.

BLOG TITLE: '{title}'

BLOG CONTENT SUMMARY:
{summary}

The description must be between 150 and 160 characters, include relevant keywords from the
title and content, and promote click-through.
Return ONLY the meta description text. No quotes, no explanations."#;

pub(crate) const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
You are a design analyzer specializing in website style analysis.
Analyze this website's HTML and CSS to understand the business behind it.

HTML CONTENT:
```html
{html}
```

CSS CONTENT:
```css
{css}
```

WEBSITE PURPOSE:
{purpose}

Return only a JSON object with this structure:
{"name": "business name", "industry": "industry type", "audience": "target audience", "purpose": "website purpose"}"#;

/// Script published as the hosted JS asset of every project.
pub(crate) const DEFAULT_BLOG_SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function () {
    var current = window.location.pathname.split('/').pop();
    document.querySelectorAll('.blog-nav a').forEach(function (link) {
        if (link.getAttribute('href').split('/').pop() === current) {
            link.classList.add('active');
        }
    });
    document.querySelectorAll('.post-content a[href^="http"]').forEach(function (link) {
        link.setAttribute('target', '_blank');
        link.setAttribute('rel', 'noopener noreferrer');
    });
});
"#;
