mod chat;
mod config;
mod contributions;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::chain::ProviderChain;
use crate::chat::prompt::build_system_prompt;
use crate::chat::session::SessionStore;
use crate::config::Config;
use crate::contributions::fetcher::ContributionsClient;
use crate::llm_client::anthropic::AnthropicProvider;
use crate::llm_client::gemini::GeminiProvider;
use crate::llm_client::openai_compat::OpenAiCompatProvider;
use crate::llm_client::{GenerationContext, TextProvider};
use crate::models::portfolio::PortfolioProfile;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    let profile = load_profile(&config);
    let generation_context = Arc::new(GenerationContext {
        system_prompt: build_system_prompt(&profile),
    });

    // Provider priority: Groq, OpenAI, Anthropic, Gemini, then the rule-based fallback.
    let http = reqwest::Client::builder().build()?;
    let providers: Vec<Arc<dyn TextProvider>> = vec![
        Arc::new(OpenAiCompatProvider::groq(http.clone(), config.groq_api_key.clone())),
        Arc::new(OpenAiCompatProvider::openai(http.clone(), config.openai_api_key.clone())),
        Arc::new(AnthropicProvider::new(http.clone(), config.anthropic_api_key.clone())),
        Arc::new(GeminiProvider::new(http, config.gemini_api_key.clone())),
    ];
    let chain = ProviderChain::new(
        providers,
        Duration::from_secs(config.provider_timeout_secs),
    );
    info!("Chat providers: {}", chain.available_providers().join(" -> "));

    let contributions = ContributionsClient::new(
        config.contributions_api_base.clone(),
        Duration::from_secs(config.contributions_cache_ttl_secs),
    )?
    .with_max_users(config.contributions_cache_max_users);
    info!(
        "Contributions source: {} (cache ttl {}s)",
        config.contributions_api_base, config.contributions_cache_ttl_secs
    );

    let state = AppState {
        config: config.clone(),
        contributions,
        chain: Arc::new(chain),
        generation_context,
        sessions: SessionStore::new(
            Duration::from_secs(config.session_idle_ttl_secs),
            config.max_sessions,
        ),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Portfolio facts from `PORTFOLIO_PROFILE_PATH`, or the built-in profile.
fn load_profile(config: &Config) -> PortfolioProfile {
    match &config.portfolio_profile_path {
        Some(path) => match PortfolioProfile::from_file(path) {
            Ok(profile) => {
                info!("Loaded portfolio profile from {path}");
                profile
            }
            Err(e) => {
                warn!("Falling back to built-in profile: {e:#}");
                PortfolioProfile::builtin()
            }
        },
        None => PortfolioProfile::builtin(),
    }
}
