//! Chat-completions providers (Groq, OpenAI). Both speak the same wire format
//! and differ only in host and model.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{
    has_credential, non_empty, send_json, GenerationContext, ProviderError, TextProvider,
    MAX_TOKENS, TEMPERATURE,
};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompatProvider {
    client: Client,
    name: &'static str,
    base_url: String,
    model: &'static str,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    pub fn groq(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            name: "Groq",
            base_url: GROQ_BASE_URL.to_string(),
            model: GROQ_MODEL,
            api_key,
        }
    }

    pub fn openai(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            name: "OpenAI",
            base_url: OPENAI_BASE_URL.to_string(),
            model: OPENAI_MODEL,
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        self.name
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
                    provider: self.name.to_string(),
                })
            }
        };

        let system = if context.system_prompt.trim().is_empty() {
            DEFAULT_SYSTEM_PROMPT
        } else {
            context.system_prompt.as_str()
        };

        let body = ChatCompletionRequest {
            model: self.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: system,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response: ChatCompletionResponse = send_json(
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(api_key)
                .json(&body),
        )
        .await?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref());
        non_empty(text)
    }
}
