use crate::common_extras::{StubLlmProvider, stub_context};
use blogsmith::PostSource;
use blogsmith::generate::{
    analyze_business, clean_response, generate_content, generate_title, parse_business,
    readable_text, strip_quotes, truncate_chars, truncate_meta, website_info,
};
use blogsmith::profile::BusinessInfo;
use spectral::prelude::*;

mod common_extras;

assert_responses![
    plain_title_kept:
        response => "Ten Ways to Speed Up Your Site",
        result => "Ten Ways to Speed Up Your Site",
    filled_think_removed:
        response => "<think>The user wants a catchy title</think>\nTen Ways to Speed Up Your Site",
        result => "Ten Ways to Speed Up Your Site",
    empty_think_removed:
        response => "<think>\n</think>\n\"Ten Ways to Speed Up Your Site\"",
        result => "Ten Ways to Speed Up Your Site",
    single_quotes_removed:
        response => "'Why Caching Matters'",
        result => "Why Caching Matters",
    blank_response_falls_back:
        response => "<think>nothing</think>   ",
        result => "Blog Post",
];

#[tokio::test]
async fn title_falls_back_when_model_fails() {
    let model = StubLlmProvider::failing();
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let title = generate_title(&ctx, &PostSource::Topic("rust".to_owned()), "").await;

    assert_that(&title.as_str()).is_equal_to("Blog Post");
}

#[tokio::test]
async fn title_prompt_carries_topic_and_website() {
    let model = StubLlmProvider::new(&["A Title"]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    generate_title(
        &ctx,
        &PostSource::Topic("static site generators".to_owned()),
        "Website name: Acme",
    )
    .await;

    let prompts = model.prompts();
    assert_that(&prompts).has_length(1);
    assert_that(&prompts[0].contains("Topic: static site generators")).is_true();
    assert_that(&prompts[0].contains("Website name: Acme")).is_true();
}

#[tokio::test]
async fn unreachable_inspiration_url_changes_the_context() {
    let model = StubLlmProvider::new(&["A Title"]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let title = generate_title(
        &ctx,
        &PostSource::Url("http://127.0.0.1:9/article".to_owned()),
        "",
    )
    .await;

    assert_that(&title.as_str()).is_equal_to("A Title");
    assert_that(&model.prompts()[0].contains("Unable to fetch content from URL")).is_true();
}

#[tokio::test]
async fn content_and_meta_come_from_two_calls() {
    let model = StubLlmProvider::new(&[
        "# Intro\n\nSome text.",
        "\"A short description of the post.\"",
    ]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let generated = generate_content(
        &ctx,
        "My Post",
        &PostSource::Topic("posts".to_owned()),
        "",
    )
    .await;

    assert_that(&generated.content.as_str()).is_equal_to("# Intro\n\nSome text.");
    assert_that(&generated.meta_description.as_str())
        .is_equal_to("A short description of the post.");
    assert_that(&model.prompts()).has_length(2);
}

#[tokio::test]
async fn content_falls_back_when_model_fails() {
    let model = StubLlmProvider::failing();
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let generated = generate_content(
        &ctx,
        "My Post",
        &PostSource::Topic("posts".to_owned()),
        "",
    )
    .await;

    assert_that(&generated.content.as_str())
        .is_equal_to("Failed to generate content for 'My Post'. Please try again later.");
    assert_that(&generated.meta_description.as_str()).is_equal_to("Blog post about My Post");
}

#[tokio::test]
async fn meta_falls_back_when_second_call_fails() {
    let model = StubLlmProvider::new(&["Body"]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let generated = generate_content(
        &ctx,
        "My Post",
        &PostSource::Existing("old body".to_owned()),
        "",
    )
    .await;

    assert_that(&generated.content.as_str()).is_equal_to("Body");
    assert_that(&generated.meta_description.as_str()).is_equal_to("Blog post about My Post");
}

#[tokio::test]
async fn long_meta_is_truncated() {
    let long = "word ".repeat(60);
    let model = StubLlmProvider::new(&["Body", long.as_str()]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let generated = generate_content(
        &ctx,
        "My Post",
        &PostSource::Topic("posts".to_owned()),
        "",
    )
    .await;

    assert_that(&generated.meta_description.chars().count()).is_less_than_or_equal_to(160);
    assert_that(&generated.meta_description.ends_with("...")).is_true();
}

#[tokio::test]
async fn business_is_parsed_from_fenced_json() {
    let model = StubLlmProvider::new(&[
        "```json\n{\"name\": \"Acme\", \"industry\": \"Retail\", \"audience\": \"Shoppers\", \"purpose\": \"\"}\n```",
    ]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let business = analyze_business(&ctx, "<html></html>", "body{}", "Sell things").await;

    assert_that(&business).is_equal_to(BusinessInfo {
        name: "Acme".to_owned(),
        industry: "Retail".to_owned(),
        audience: "Shoppers".to_owned(),
        purpose: "Sell things".to_owned(),
    });
}

#[tokio::test]
async fn business_falls_back_on_prose() {
    let model = StubLlmProvider::new(&["I cannot tell what this site is about."]);
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let business = analyze_business(&ctx, "", "", "Portfolio").await;

    assert_that(&business).is_equal_to(BusinessInfo::fallback("Portfolio"));
}

#[tokio::test]
async fn business_falls_back_when_model_fails() {
    let model = StubLlmProvider::failing();
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);

    let business = analyze_business(&ctx, "", "", "Portfolio").await;

    assert_that(&business.name.as_str()).is_equal_to("Website");
    assert_that(&business.industry.as_str()).is_equal_to("Technology");
    assert_that(&business.audience.as_str()).is_equal_to("Developers");
    assert_that(&business.purpose.as_str()).is_equal_to("Portfolio");
}

#[tokio::test]
async fn analysis_source_is_truncated() {
    let model = StubLlmProvider::failing();
    let http = reqwest::Client::new();
    let ctx = stub_context(&model, &http);
    let html = "x".repeat(20_000);

    analyze_business(&ctx, &html, "", "").await;

    let prompts = model.prompts();
    let prompt = &prompts[0];
    assert_that(&prompt.contains(&"x".repeat(15_000))).is_true();
    assert_that(&prompt.contains(&"x".repeat(15_001))).is_false();
}

#[test]
fn partial_business_json_keeps_defaults() {
    let business = parse_business(r#"{"name": "Acme"}"#).unwrap();

    assert_that(&business.name.as_str()).is_equal_to("Acme");
    assert_that(&business.industry.as_str()).is_equal_to("Technology");
}

#[test]
fn clean_response_strips_reasoning() {
    assert_that(&clean_response("<think>a\nb</think>\n  answer \n").as_str()).is_equal_to("answer");
}

#[test]
fn strip_quotes_needs_matching_pair() {
    assert_that(&strip_quotes("\"quoted\"")).is_equal_to("quoted");
    assert_that(&strip_quotes("\"unbalanced")).is_equal_to("\"unbalanced");
    assert_that(&strip_quotes("it's fine")).is_equal_to("it's fine");
}

#[test]
fn truncate_chars_respects_char_boundaries() {
    assert_that(&truncate_chars("héllo wörld", 7)).is_equal_to("héllo w");
    assert_that(&truncate_chars("short", 100)).is_equal_to("short");
}

#[test]
fn truncate_meta_keeps_short_text() {
    let exact = "a".repeat(160);

    assert_that(&truncate_meta(&exact)).is_equal_to(exact.clone());
    assert_that(&truncate_meta(&"a".repeat(161))).is_equal_to(format!("{}...", "a".repeat(157)));
}

#[test]
fn website_info_prefers_business_purpose() {
    let business = BusinessInfo {
        name: "Acme".to_owned(),
        industry: "Retail".to_owned(),
        audience: "Shoppers".to_owned(),
        purpose: String::new(),
    };

    let info = website_info(Some(&business), Some("Sell things"));

    assert_that(&info.as_str()).is_equal_to(
        "Website name: Acme\nIndustry: Retail\nTarget audience: Shoppers\nPurpose: Sell things",
    );
    assert_that(&website_info(None, None).as_str()).is_equal_to("Purpose: a business website");
}

#[test]
fn readable_text_extracts_article_body() {
    let html = r#"<html><head><title>Post</title></head><body>
        <nav><a href="/">Home</a></nav>
        <article>
            <h1>Caching in practice</h1>
            <p>Caching keeps frequently used data close to where it is needed, which makes
            repeated reads fast and takes load off slower storage layers behind it.</p>
            <p>Every cache needs an eviction policy. Least recently used is a common default
            because it adapts to changing access patterns without tuning.</p>
            <p>Sizing a cache is a trade-off between memory and hit rate. Measure the working set
            first, then pick a capacity that holds it with some headroom for bursts of traffic.</p>
            <p>Invalidation is the hard part. Prefer short expiry times for data that changes often,
            and explicit invalidation on writes for data that must never be stale, such as prices.</p>
            <p>Finally, monitor the hit ratio over time. A falling ratio usually means the working set
            has grown or the access pattern has shifted, and the cache needs another look.</p>
        </article>
        </body></html>"#;

    let text = readable_text(html).unwrap();

    assert_that(&text.contains("eviction policy")).is_true();
}
