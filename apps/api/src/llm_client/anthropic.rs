//! Anthropic Messages API provider.
//!
//! The system prompt travels inside the single user turn rather than the
//! `system` field, matching how the portfolio prompt has always been sent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::{
    has_credential, non_empty, send_json, GenerationContext, ProviderError, TextProvider,
    MAX_TOKENS,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Text of the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AnthropicProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "Anthropic Claude"
    }

    fn is_available(&self) -> bool {
        has_credential(&self.api_key)
    }

    async fn generate(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<String, ProviderError> {
        let api_key = match &self.api_key {
            Some(key) if self.is_available() => key,
            _ => {
                return Err(ProviderError::Unavailable {
                    provider: self.name().to_string(),
                })
            }
        };

        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user",
                content: format!("{}\n\n{}", context.system_prompt, prompt),
            }],
        };

        let response: AnthropicResponse = send_json(
            self.client
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )
        .await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Anthropic call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        non_empty(response.text())
    }
}
