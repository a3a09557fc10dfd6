use anyhow::{Context, Result};

const DEFAULT_LLM_API_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration loaded from environment variables.
///
/// A missing LLM key does not stop startup; each pipeline invocation fails
/// with a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// When set, `/api/v1/*` requests must present this key.
    pub service_api_key: Option<String>,
    pub min_job_description_chars: usize,
    pub session_ttl_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_api_url: optional_env("LLM_API_URL")
                .unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            service_api_key: optional_env("SERVICE_API_KEY"),
            min_job_description_chars: parse_env("MIN_JOB_DESCRIPTION_CHARS", 50)?,
            session_ttl_minutes: parse_env("SESSION_TTL_MINUTES", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by router and workflow tests. No network is reached.
    pub fn for_tests() -> Self {
        Config {
            llm_api_key: Some("test-key".to_string()),
            llm_api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 5,
            service_api_key: None,
            min_job_description_chars: 50,
            session_ttl_minutes: 120,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
