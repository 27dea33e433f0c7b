//! The format module turns loosely structured, markdown-like text produced by
//! the text model into an HTML fragment for the post template.
//!
//! Input is processed as blocks separated by blank lines. Each block is
//! classified by its leading token, in this order: heading (`#`, `##`, `###`,
//! rendered one level lower as `<h2>`..`<h4>` so the post title keeps the
//! document `<h1>`), unordered list, ordered list, blockquote, fenced code,
//! paragraph. A fence without a closing fence degrades to a paragraph holding
//! the raw text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ORDERED_ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("Failed to compile ORDERED_ITEM regex"));

static CODE_SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("Failed to compile CODE_SPAN regex"));

static BOLD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Failed to compile BOLD regex"));

static ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").expect("Failed to compile ITALIC regex")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s<]+|www\.[^\s<]+").expect("Failed to compile URL regex")
});

const FENCE: &str = "```";

/// Escaped quote and angle bracket entities end a bare URL.
const URL_STOP_ENTITIES: [&str; 4] = ["&quot;", "&#39;", "&lt;", "&gt;"];

/// Escapes the five HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Formats raw post text as an HTML fragment. Pure and deterministic:
/// formatting the same text twice yields byte-identical output.
pub fn format_post(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut fragments = Vec::new();
    let mut index = 0;

    while let Some(line) = lines.get(index) {
        if line.trim().is_empty() {
            index += 1;
            continue;
        }

        if is_fence(line) {
            if let Some(close) = closing_fence(&lines, index) {
                let code = lines.get(index + 1..close).unwrap_or_default();
                fragments.push(render_code(line, code));
                index = close + 1;
                continue;
            }
            let end = block_end(&lines, index);
            let raw = lines.get(index..end).unwrap_or_default();
            fragments.push(format!("<p>{}</p>", escape_html(&raw.join("\n"))));
            index = end;
            continue;
        }

        let end = block_end(&lines, index);
        render_block(lines.get(index..end).unwrap_or_default(), &mut fragments);
        index = end;
    }

    fragments.join("\n")
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

fn closing_fence(lines: &[&str], open: usize) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .skip(open + 1)
        .find(|(_, line)| line.trim() == FENCE)
        .map(|(index, _)| index)
}

/// Index one past the last line of the block starting at `start`. A block
/// ends at a blank line or where a code fence opens.
fn block_end(lines: &[&str], start: usize) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim().is_empty() || is_fence(line))
        .map_or(lines.len(), |(index, _)| index)
}

fn render_block(block: &[&str], fragments: &mut Vec<String>) {
    let Some((first, rest)) = block.split_first() else {
        return;
    };

    if let Some((level, heading)) = heading(first) {
        fragments.push(format!("<h{level}>{}</h{level}>", escape_html(heading)));
        render_block(rest, fragments);
    } else if unordered_item(first).is_some() {
        fragments.push(render_list("ul", block, unordered_item));
    } else if ordered_item(first).is_some() {
        fragments.push(render_list("ol", block, ordered_item));
    } else if quoted(first).is_some() {
        let quote: Vec<&str> = block
            .iter()
            .map(|line| quoted(line).unwrap_or(line.trim()))
            .collect();
        fragments.push(format!(
            "<blockquote><p>{}</p></blockquote>",
            format_inline(&quote.join("\n"))
        ));
    } else {
        let paragraph: Vec<&str> = block.iter().map(|line| line.trim()).collect();
        fragments.push(format!("<p>{}</p>", format_inline(&paragraph.join("\n"))));
    }
}

/// Heading level in the output document and the heading text.
fn heading(line: &str) -> Option<(u8, &str)> {
    let line = line.trim();
    [("### ", 4), ("## ", 3), ("# ", 2)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|text| (level, text.trim())))
}

fn unordered_item(line: &str) -> Option<&str> {
    let line = line.trim_start();
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

fn ordered_item(line: &str) -> Option<&str> {
    ORDERED_ITEM_REGEX
        .captures(line.trim_start())
        .and_then(|captures| captures.get(1))
        .map(|item| item.as_str().trim())
}

fn quoted(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix('>').map(str::trim)
}

/// Lines not starting with an item marker continue the previous item.
fn render_list(tag: &str, block: &[&str], item: fn(&str) -> Option<&str>) -> String {
    let mut items: Vec<String> = Vec::new();
    for line in block.iter().copied() {
        if let Some(text) = item(line) {
            items.push(text.to_owned());
            continue;
        }
        match items.last_mut() {
            Some(last) => {
                last.push(' ');
                last.push_str(line.trim());
            }
            None => items.push(line.trim().to_owned()),
        }
    }

    let items: Vec<String> = items
        .iter()
        .map(|text| format!("<li>{}</li>", format_inline(text)))
        .collect();
    format!("<{tag}>\n{}\n</{tag}>", items.join("\n"))
}

fn render_code(fence: &str, code: &[&str]) -> String {
    let language = fence.trim().trim_start_matches('`').trim();
    let class = if language.is_empty() {
        String::new()
    } else {
        format!(r#" class="language-{}""#, escape_html(language))
    };
    format!(
        "<pre><code{class}>{}</code></pre>",
        escape_html(&code.join("\n"))
    )
}

/// Applies inline code, bold, italic and bare URL substitution to escaped text.
/// Code spans are left untouched by the other substitutions.
pub fn format_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let mut formatted = String::with_capacity(escaped.len());
    let mut last = 0;

    for captures in CODE_SPAN_REGEX.captures_iter(&escaped) {
        let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        formatted.push_str(&emphasize(escaped.get(last..whole.start()).unwrap_or_default()));
        formatted.push_str("<code>");
        formatted.push_str(code.as_str());
        formatted.push_str("</code>");
        last = whole.end();
    }
    formatted.push_str(&emphasize(escaped.get(last..).unwrap_or_default()));

    formatted
}

fn emphasize(text: &str) -> String {
    let text = BOLD_REGEX.replace_all(text, "<strong>${1}</strong>");
    let text = ITALIC_REGEX.replace_all(&text, "<em>${1}</em>");
    linkify(&text)
}

fn linkify(text: &str) -> String {
    URL_REGEX
        .replace_all(text, |captures: &Captures<'_>| {
            let found = captures.get(0).map_or("", |url| url.as_str());
            let end = URL_STOP_ENTITIES
                .iter()
                .filter_map(|entity| found.find(entity))
                .min()
                .unwrap_or(found.len());
            let url = found
                .get(..end)
                .unwrap_or(found)
                .trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
            let trailing = found.get(url.len()..).unwrap_or_default();
            let href = if url.starts_with("www.") {
                format!("https://{url}")
            } else {
                url.to_owned()
            };
            format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{url}</a>{trailing}"#)
        })
        .into_owned()
}
