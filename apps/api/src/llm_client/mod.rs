/// LLM Client: the single point of entry for all text-generation API calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider HTTP API directly.
/// Every backend implements `TextProvider` and is driven by `chat::chain`.
///
/// Providers never retry: a failed call is reported once and the chain moves on.
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;
pub mod prompts;

/// Output budget shared by every provider.
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured")]
    Unavailable { provider: String },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned empty content")]
    EmptyContent,

    #[error("provider did not answer within {secs}s")]
    Timeout { secs: u64 },
}

/// Request URLs may carry credentials, so they are stripped before the error is kept.
impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Http(e.without_url())
    }
}

/// Everything a provider may use besides the user's prompt.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub system_prompt: String,
}

/// A text-generation backend. Availability is a static check (e.g. a
/// credential is present) and never performs I/O.
#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool;

    async fn generate(
        &self,
        prompt: &str,
        context: &GenerationContext,
    ) -> Result<String, ProviderError>;
}

pub(crate) fn has_credential(api_key: &Option<String>) -> bool {
    api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

/// Returns the trimmed text, or `EmptyContent` when nothing usable came back.
pub(crate) fn non_empty(text: Option<&str>) -> Result<String, ProviderError> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(ProviderError::EmptyContent),
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends a request and decodes a 2xx JSON body. Non-2xx statuses become
/// `ProviderError::Api`, using the `{ "error": { "message" } }` body when present.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response.json().await?)
}

#[cfg(test)]
pub(crate) fn test_context() -> GenerationContext {
    GenerationContext {
        system_prompt: "You are a portfolio assistant.".to_string(),
    }
}
