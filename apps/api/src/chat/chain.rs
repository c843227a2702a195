//! Provider chain: tries each configured generation provider in priority order
//! and falls back to the deterministic responder.
//!
//! Every request walks the chain from the top; nothing about the previous
//! request's winner is remembered. A provider that is unavailable, errors,
//! returns empty text, or exceeds the timeout is skipped for this request only.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::chat::rules::RuleBasedResponder;
use crate::llm_client::{GenerationContext, ProviderError, TextProvider};

/// Returned if even the deterministic responder somehow produced nothing.
pub const GENERIC_APOLOGY: &str =
    "Sorry, I encountered an error. Please try again or contact Veera directly.";

/// Raw provider output plus the name of the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedReply {
    pub text: String,
    pub provider: String,
}

pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
    fallback: RuleBasedResponder,
    timeout: Duration,
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn TextProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            fallback: RuleBasedResponder,
            timeout,
        }
    }

    /// Names of providers that would be attempted right now, fallback last.
    pub fn available_providers(&self) -> Vec<String> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name().to_string())
            .chain(std::iter::once(RuleBasedResponder::NAME.to_string()))
            .collect()
    }

    /// Produces non-empty text for `query`. Never fails.
    pub async fn select_and_generate(
        &self,
        query: &str,
        context: &GenerationContext,
    ) -> GeneratedReply {
        for provider in &self.providers {
            if !provider.is_available() {
                debug!("Skipping {}: not configured", provider.name());
                continue;
            }

            match self.call_provider(provider.as_ref(), query, context).await {
                Ok(text) => {
                    debug!("{} answered ({} chars)", provider.name(), text.len());
                    return GeneratedReply {
                        text,
                        provider: provider.name().to_string(),
                    };
                }
                Err(e) => warn!("{} failed, trying next provider: {e}", provider.name()),
            }
        }

        let text = self.fallback.respond(query);
        let text = if text.trim().is_empty() {
            GENERIC_APOLOGY
        } else {
            text
        };

        GeneratedReply {
            text: text.to_string(),
            provider: RuleBasedResponder::NAME.to_string(),
        }
    }

    async fn call_provider(
        &self,
        provider: &dyn TextProvider,
        query: &str,
        context: &GenerationContext,
    ) -> Result<String, ProviderError> {
        let text = tokio::time::timeout(self.timeout, provider.generate(query, context))
            .await
            .map_err(|_| ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::test_context;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubProvider {
        name: &'static str,
        available: bool,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(name: &'static str, available: bool, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                name,
                available,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn generate(
            &self,
            _prompt: &str,
            _context: &GenerationContext,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Reply(text) => Ok(text.to_string()),
                Behaviour::Fail => Err(ProviderError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn chain(providers: Vec<Arc<dyn TextProvider>>) -> ProviderChain {
        ProviderChain::new(providers, Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_no_providers_uses_fallback() {
        let reply = chain(vec![])
            .select_and_generate("What are your skills?", &test_context())
            .await;
        assert_eq!(reply.provider, "Fallback");
        assert!(reply.text.contains("[[NAV:#skills]]"));
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_never_called() {
        let a = StubProvider::new("A", false, Behaviour::Reply("from A"));
        let b = StubProvider::new("B", true, Behaviour::Reply("from B"));
        let reply = chain(vec![a.clone(), b.clone()])
            .select_and_generate("hi", &test_context())
            .await;

        assert_eq!(reply.text, "from B");
        assert_eq!(reply.provider, "B");
        assert_eq!(a.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_without_retry() {
        let a = StubProvider::new("A", true, Behaviour::Fail);
        let b = StubProvider::new("B", true, Behaviour::Reply("from B"));
        let reply = chain(vec![a.clone(), b.clone()])
            .select_and_generate("hi", &test_context())
            .await;

        assert_eq!(reply.provider, "B");
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 1);
    }

    #[tokio::test]
    async fn test_first_success_stops_the_walk() {
        let a = StubProvider::new("A", true, Behaviour::Reply("from A"));
        let b = StubProvider::new("B", true, Behaviour::Reply("from B"));
        let reply = chain(vec![a.clone(), b.clone()])
            .select_and_generate("hi", &test_context())
            .await;

        assert_eq!(reply.provider, "A");
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_failing_ends_in_fallback() {
        let a = StubProvider::new("A", true, Behaviour::Fail);
        let b = StubProvider::new("B", true, Behaviour::Reply("   "));
        let reply = chain(vec![a, b])
            .select_and_generate("hello", &test_context())
            .await;

        assert_eq!(reply.provider, "Fallback");
        assert!(reply.text.starts_with("Hello!"));
    }

    #[tokio::test]
    async fn test_each_request_restarts_from_the_top() {
        let a = StubProvider::new("A", true, Behaviour::Fail);
        let b = StubProvider::new("B", true, Behaviour::Reply("from B"));
        let chain = chain(vec![a.clone(), b.clone()]);

        chain.select_and_generate("one", &test_context()).await;
        chain.select_and_generate("two", &test_context()).await;
        assert_eq!(a.calls(), 2);
        assert_eq!(b.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_provider_times_out() {
        let slow = StubProvider::new("Slow", true, Behaviour::Hang);
        let backup = StubProvider::new("Backup", true, Behaviour::Reply("from backup"));
        let chain = ProviderChain::new(vec![slow, backup], Duration::from_secs(10));

        let reply = chain.select_and_generate("hi", &test_context()).await;
        assert_eq!(reply.provider, "Backup");
    }

    #[test]
    fn test_available_providers_lists_fallback_last() {
        let a = StubProvider::new("A", false, Behaviour::Fail);
        let b = StubProvider::new("B", true, Behaviour::Fail);
        let names = chain(vec![a, b]).available_providers();
        assert_eq!(names, vec!["B".to_string(), "Fallback".to_string()]);
    }
}
