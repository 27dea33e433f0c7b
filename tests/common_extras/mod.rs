#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use blogsmith::generate::GenerateContext;
use blogsmith::storage::{Post, Project};
use blogsmith::{StyleProfile, Theme};
use chrono::{DateTime, Utc};
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};

#[macro_export]
macro_rules! assert_responses {
    (
        $(
            $test_name:ident : response => $response:expr, result => $result:expr
        ),+ $(,)?
    ) => {
        $(
            #[tokio::test]
            async fn $test_name() {
                let model = StubLlmProvider::new(&[$response]);
                let http = reqwest::Client::new();
                let context = stub_context(&model, &http);
                let result = blogsmith::generate::generate_title(
                    &context,
                    &blogsmith::PostSource::Topic("testing".to_owned()),
                    "Purpose: tests",
                )
                .await;

                assert_that(&result).is_equal_to($result.to_owned());
            }
        )+
    }
}

/// Answers with queued responses in order, then fails.
pub(crate) struct StubLlmProvider {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl StubLlmProvider {
    pub fn new(responses: &[&str]) -> Self {
        StubLlmProvider {
            responses: Mutex::new(responses.iter().map(|r| (*r).to_owned()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::new(&[])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub(crate) fn stub_context<'a>(
    model: &'a StubLlmProvider,
    http: &'a reqwest::Client,
) -> GenerateContext<'a> {
    GenerateContext {
        model,
        rate_limiter: None,
        timeout: Duration::from_secs(5),
        http,
    }
}

impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        messages: &'life1 [ChatMessage],
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            #[derive(Debug)]
            struct StringResponse(String);

            impl ChatResponse for StringResponse {
                fn text(&self) -> Option<String> {
                    Some(self.0.clone())
                }

                fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
                    panic!()
                }

                fn thinking(&self) -> Option<String> {
                    None
                }

                fn usage(&self) -> Option<llm::chat::Usage> {
                    None
                }
            }

            impl std::fmt::Display for StringResponse {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{}", self.0)
                }
            }

            self.prompts
                .lock()
                .unwrap()
                .extend(messages.iter().map(|message| message.content.clone()));

            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(response) => Ok(Box::new(StringResponse(response)) as Box<dyn ChatResponse>),
                None => Err(LLMError::ProviderError("no stub response left".to_owned())),
            }
        })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        panic!()
    }
}

pub(crate) fn sample_project(id: i64) -> Project {
    Project {
        id,
        name: "Acme".to_owned(),
        description: None,
        website_purpose: None,
        html_file_path: None,
        css_file_path: None,
        hosted_css_filename: None,
        hosted_js_filename: None,
        style_profile: Some(StyleProfile::default()),
        theme: Theme::Default,
        blog_template: None,
        post_template: None,
        created_at: fixed_time(),
    }
}

pub(crate) fn sample_post(id: i64, title: &str, html_content: &str) -> Post {
    Post {
        id,
        project_id: 7,
        title: title.to_owned(),
        raw_content: String::new(),
        html_content: html_content.to_owned(),
        meta_description: Some(format!("About {title}")),
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

pub(crate) fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_690_000_000, 0).unwrap()
}
