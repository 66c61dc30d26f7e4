//! CLI commands: support check, model listing, config info.
//!
//! These produce plain text output on stdout; diagnostics go through `log`.

use std::io::{self, Read};

use crate::core::api_key;
use crate::core::config::{Config, KeySource};
use crate::core::models::{ModelCache, Provider, RECOMMENDED_MODELS};
use crate::core::paths;
use crate::core::util;

/// Run the `check` command. Returns whether the model is supported.
pub async fn run_check(cache: &ModelCache, model: &str, provider: Provider) -> bool {
    cache.preload(provider);
    let supported = cache.is_model_supported(Some(model), provider).await;
    let verdict = if supported { "supported" } else { "unsupported" };
    println!("{}: {} ({})", model.trim(), verdict, provider);
    supported
}

/// Run the `models` command: list model ids, optionally filtered by query.
pub async fn run_models(cache: &ModelCache, provider: Provider, query: Option<&str>) {
    let models = cache.get_available_models(provider).await;
    let filtered = util::filter_by_query(&models, query.unwrap_or(""), |m| m.as_str());
    if filtered.is_empty() {
        eprintln!("No {} models available.", provider);
        return;
    }
    for id in filtered {
        println!("{}", id);
    }
}

/// Run the `recommended` command.
pub fn run_recommended() {
    for id in RECOMMENDED_MODELS {
        println!("{}", id);
    }
}

/// Run the `config` command: display config dir, base URLs, and API key status.
pub fn run_config(config: &Config) {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());

    println!("Config:        {}", config_dir);
    println!("HTTP-Referer:  {}", config.http_referer);
    for provider in Provider::ALL {
        let p = config.provider(provider);
        let key_status = match p.key_source {
            Some(KeySource::Env) => "set ✓ (env)",
            Some(KeySource::ConfigDir) => "set ✓ (config dir)",
            None => "not set",
        };
        println!("{}:", provider);
        println!("  Base URL:    {}", p.base_url);
        println!("  API key:     {}", key_status);
    }
}

/// Run the `config set-api-key` command: store a provider's API key in the config directory.
pub fn run_config_set_api_key(provider: Provider, api_key: Option<String>) {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k,
        _ => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            buf
        }
    };

    match api_key::store_api_key(provider, &key) {
        Ok(path) => println!("{} API key saved to {}", provider, path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
