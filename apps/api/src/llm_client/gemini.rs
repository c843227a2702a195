//! Google Gemini `generateContent` provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{
    has_credential, non_empty, send_json, GenerationContext, ProviderError, TextProvider,
    MAX_TOKENS, TEMPERATURE,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Google Gemini"
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

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(format!("{}\n\n{}", context.system_prompt, prompt)),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_TOKENS,
                temperature: TEMPERATURE,
            },
        };

        let response: GenerateContentResponse = send_json(
            self.client
                .post(format!("{}/models/{}:generateContent", self.base_url, MODEL))
                .header("x-goog-api-key", api_key.as_str())
                .json(&body),
        )
        .await?;

        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref());
        non_empty(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_context;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_content_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "gm-test"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "You are a portfolio assistant.\n\nhello" }] }],
                "generationConfig": { "maxOutputTokens": 500 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "Hi there!" }], "role": "model" } }]
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(Client::new(), Some("gm-test".to_string()))
            .with_base_url(server.uri());
        let text = provider.generate("hello", &test_context()).await.unwrap();
        assert_eq!(text, "Hi there!");
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(Client::new(), Some("gm".to_string()))
            .with_base_url(server.uri());
        let err = provider.generate("hello", &test_context()).await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyContent));
    }

    #[tokio::test]
    async fn test_connection_error_does_not_reveal_key() {
        let provider = GeminiProvider::new(Client::new(), Some("SECRET-KEY-123".to_string()))
            .with_base_url("http://127.0.0.1:9");
        let err = provider.generate("hello", &test_context()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }
}
