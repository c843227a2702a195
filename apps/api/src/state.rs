use std::sync::Arc;

use crate::chat::chain::ProviderChain;
use crate::chat::session::SessionStore;
use crate::config::Config;
use crate::contributions::fetcher::ContributionsClient;
use crate::llm_client::GenerationContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Contribution samples, cached per username.
    pub contributions: ContributionsClient,
    /// Provider order is fixed at startup; each request walks it from the top.
    pub chain: Arc<ProviderChain>,
    /// System prompt and portfolio facts shared by every chat request.
    pub generation_context: Arc<GenerationContext>,
    pub sessions: SessionStore,
}
