//! Runtime configuration assembled from flags and the environment

use std::path::PathBuf;
use std::time::Duration;

use cubehub_engine::openai::{OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";

#[derive(Debug, Clone)]
pub struct Config {
    pub db: PathBuf,
    pub timeout: Duration,
    pub scryfall_url: String,
    pub cubecobra_url: String,
    /// None when no API key is configured
    pub openai: Option<OpenAiConfig>,
}

impl Config {
    pub fn new(
        db: PathBuf,
        timeout_secs: u64,
        scryfall_url: String,
        cubecobra_url: String,
    ) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        Self {
            db,
            timeout,
            scryfall_url,
            cubecobra_url,
            openai: openai_from_env(timeout),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn openai_from_env(timeout: Duration) -> Option<OpenAiConfig> {
    let api_key = non_empty_var(ENV_OPENAI_API_KEY)?;
    let mut config = OpenAiConfig::new(api_key);
    config.base_url =
        non_empty_var(ENV_OPENAI_BASE_URL).unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    config.model =
        non_empty_var(ENV_OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
    config.timeout = timeout;
    Some(config)
}
