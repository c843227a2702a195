use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Provider keys are optional: a missing or blank key marks that provider unavailable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub contributions_api_base: String,
    pub github_username: String,
    pub contributions_cache_ttl_secs: u64,
    pub contributions_cache_max_users: usize,
    pub provider_timeout_secs: u64,
    pub session_idle_ttl_secs: u64,
    pub max_sessions: usize,
    pub portfolio_profile_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            groq_api_key: optional_env("GROQ_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            contributions_api_base: optional_env("CONTRIBUTIONS_API_BASE")
                .unwrap_or_else(|| "https://github-contributions-api.jogruber.de".to_string()),
            github_username: optional_env("GITHUB_USERNAME")
                .unwrap_or_else(|| "Venkat0629".to_string()),
            contributions_cache_ttl_secs: parse_env("CONTRIBUTIONS_CACHE_TTL_SECS", 3600)?,
            contributions_cache_max_users: parse_env("CONTRIBUTIONS_CACHE_MAX_USERS", 256)?,
            provider_timeout_secs: parse_env("PROVIDER_TIMEOUT_SECS", 10)?,
            session_idle_ttl_secs: parse_env("SESSION_IDLE_TTL_SECS", 1800)?,
            max_sessions: parse_env("MAX_SESSIONS", 1000)?,
            portfolio_profile_path: optional_env("PORTFOLIO_PROFILE_PATH"),
        })
    }
}

/// Returns the variable's value, treating unset and blank alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with every provider disabled, for handler tests.
    pub fn for_tests(contributions_api_base: &str) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            groq_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            gemini_api_key: None,
            contributions_api_base: contributions_api_base.to_string(),
            github_username: "octocat".to_string(),
            contributions_cache_ttl_secs: 60,
            contributions_cache_max_users: 16,
            provider_timeout_secs: 10,
            session_idle_ttl_secs: 600,
            max_sessions: 16,
            portfolio_profile_path: None,
        }
    }
}
