use std::env;

use crate::core::api_key;
use crate::core::models::Provider;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_HTTP_REFERER: &str = "https://github.com/openai/codex";

/// Where a provider's API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    ConfigDir,
}

/// Base URL and credential for one provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub key_source: Option<KeySource>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai: ProviderConfig,
    pub openrouter: ProviderConfig,
    /// Sent as `HTTP-Referer` on OpenRouter requests.
    pub http_referer: String,
}

impl Config {
    pub fn provider(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::OpenRouter => &self.openrouter,
        }
    }
}

/// Load configuration from the environment, falling back to keys stored in the config directory.
/// Missing keys are not an error: the model cache degrades to its offline fallback.
pub fn load() -> Config {
    load_with(|name| env::var(name).ok(), api_key::load_api_key)
}

fn load_with<E, S>(env_var: E, stored_key: S) -> Config
where
    E: Fn(&str) -> Option<String>,
    S: Fn(Provider) -> Option<String>,
{
    // Blank values count as unset.
    let var = |name: &str| {
        env_var(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let provider = |p: Provider| {
        let (key_var, url_var, default_url) = match p {
            Provider::OpenAi => ("OPENAI_API_KEY", "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            Provider::OpenRouter => (
                "OPENROUTER_API_KEY",
                "OPENROUTER_BASE_URL",
                DEFAULT_OPENROUTER_BASE_URL,
            ),
        };
        let (api_key, key_source) = match var(key_var) {
            Some(k) => (Some(k), Some(KeySource::Env)),
            None => match stored_key(p) {
                Some(k) => (Some(k), Some(KeySource::ConfigDir)),
                None => (None, None),
            },
        };
        ProviderConfig {
            base_url: var(url_var)
                .unwrap_or_else(|| default_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            key_source,
        }
    };

    Config {
        openai: provider(Provider::OpenAi),
        openrouter: provider(Provider::OpenRouter),
        http_referer: var("MODEL_CHECK_HTTP_REFERER")
            .unwrap_or_else(|| DEFAULT_HTTP_REFERER.to_string()),
    }
}
