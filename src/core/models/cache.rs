//! Per-provider, fetch-once model list cache with a fail-open support check.
//!
//! Each provider has a single-assignment cell. The first caller to need a provider's list spawns
//! the fetch as its own tokio task and stores a shared handle to its result; every later caller
//! awaits that same handle. Nothing is ever refreshed: a failed fetch stays cached as an empty
//! list for the lifetime of the cache.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};

use crate::core::config::Config;
use crate::core::util;

use super::fetch::{ModelSource, OpenAiModels, OpenRouterModels, fetch_models};
use super::provider::Provider;

/// How long a support check waits for the model list before allowing the model.
pub const MODEL_LIST_TIMEOUT: Duration = Duration::from_millis(2_000);

type ModelList = Arc<[String]>;
type SharedFetch = Shared<BoxFuture<'static, ModelList>>;

struct Slot {
    provider: Provider,
    /// `None` when the provider has no API key.
    source: Option<Arc<dyn ModelSource>>,
    fetch: OnceLock<SharedFetch>,
}

impl Slot {
    fn new(provider: Provider, source: Option<Arc<dyn ModelSource>>) -> Self {
        Self {
            provider,
            source,
            fetch: OnceLock::new(),
        }
    }

    /// Shared handle to the provider's fetch, spawning it on first use.
    /// Must be called from within a tokio runtime.
    fn fetch(&self) -> SharedFetch {
        self.fetch
            .get_or_init(|| {
                let provider = self.provider;
                let source = self.source.clone();
                debug!("Starting {} model fetch", provider);
                let task =
                    tokio::spawn(async move { fetch_models(provider, source.as_deref()).await });
                async move {
                    match task.await {
                        Ok(models) => ModelList::from(models),
                        Err(e) => {
                            warn!("{} model fetch task failed: {}", provider, e);
                            ModelList::default()
                        }
                    }
                }
                .boxed()
                .shared()
            })
            .clone()
    }
}

/// Cache of available model ids, one fetch per provider.
///
/// Construct one per session and share it (e.g. behind an `Arc`); each instance fetches
/// independently.
pub struct ModelCache {
    openai: Slot,
    openrouter: Slot,
}

impl ModelCache {
    /// Build a cache backed by the real provider APIs. Providers without an API key never hit the
    /// network.
    pub fn new(config: &Config) -> Self {
        let openai = OpenAiModels::from_config(&config.openai)
            .map(|s| Arc::new(s) as Arc<dyn ModelSource>);
        let openrouter = OpenRouterModels::from_config(&config.openrouter, &config.http_referer)
            .map(|s| Arc::new(s) as Arc<dyn ModelSource>);
        Self::with_sources(openai, openrouter)
    }

    /// Build a cache over arbitrary sources. `None` means the provider has no API key.
    pub fn with_sources(
        openai: Option<Arc<dyn ModelSource>>,
        openrouter: Option<Arc<dyn ModelSource>>,
    ) -> Self {
        Self {
            openai: Slot::new(Provider::OpenAi, openai),
            openrouter: Slot::new(Provider::OpenRouter, openrouter),
        }
    }

    fn slot(&self, provider: Provider) -> &Slot {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::OpenRouter => &self.openrouter,
        }
    }

    /// Start fetching `provider`'s models in the background without waiting for them.
    /// Idempotent. Must be called from within a tokio runtime.
    pub fn preload(&self, provider: Provider) {
        debug!("Preloading {} models", provider);
        drop(self.slot(provider).fetch());
    }

    /// Sorted model ids for `provider`, fetching them on first call.
    pub async fn get_available_models(&self, provider: Provider) -> Vec<String> {
        self.slot(provider).fetch().await.to_vec()
    }

    pub async fn get_available_openrouter_models(&self) -> Vec<String> {
        self.get_available_models(Provider::OpenRouter).await
    }

    /// Whether `model` is likely accepted by `provider`.
    ///
    /// Fails open: blank models, recommended models, an empty list, and a list that is not ready
    /// within [`MODEL_LIST_TIMEOUT`] all count as supported. Otherwise the trimmed model must
    /// match an id exactly.
    pub async fn is_model_supported(&self, model: Option<&str>, provider: Provider) -> bool {
        let Some(model) = model.filter(|m| !m.trim().is_empty()) else {
            debug!("No model given, allowing");
            return true;
        };
        if provider.is_recommended(model) {
            debug!("{} is a recommended model, allowing", model);
            return true;
        }

        let models = util::first_or_default(self.slot(provider).fetch(), MODEL_LIST_TIMEOUT).await;
        if models.is_empty() {
            info!(
                "No {} models available (timeout or empty list), allowing {}",
                provider, model
            );
            return true;
        }

        let model = model.trim();
        let supported = models.iter().any(|m| m == model);
        debug!(
            "{} supported by {}: {} ({} models)",
            model,
            provider,
            supported,
            models.len()
        );
        supported
    }
}
