use anyhow::{Context, Result};

use crate::review::parser::JsonExtraction;

const DEFAULT_CHAT_API_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_api_key: String,
    pub chat_api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
    pub readiness_probe_interval_ms: u64,
    /// Sessions idle longer than this are dropped.
    pub session_ttl_secs: u64,
    pub json_extraction: JsonExtraction,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            chat_api_key: require_env("CHAT_API_KEY")?,
            chat_api_base_url: std::env::var("CHAT_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CHAT_API_BASE_URL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            readiness_probe_interval_ms: parse_env("READINESS_PROBE_INTERVAL_MS", 300)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            json_extraction: match std::env::var("JSON_EXTRACTION") {
                Ok(value) => value
                    .parse()
                    .map_err(anyhow::Error::msg)
                    .context("JSON_EXTRACTION must be 'greedy' or 'balanced'")?,
                Err(_) => JsonExtraction::default(),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number")),
        Err(_) => Ok(default),
    }
}
