//! Fetch model lists from OpenAI and OpenRouter.

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::ProviderConfig;

use super::provider::{Provider, RECOMMENDED_MODELS};

/// Errors from a model listing call. Never surfaced past [`fetch_models`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("{0}")]
    Other(String),
}

/// A remote listing of model identifiers for one provider.
pub trait ModelSource: Send + Sync {
    fn list_models(&self) -> BoxFuture<'_, Result<Vec<String>, FetchError>>;
}

/// Lists models through the OpenAI-compatible `/models` endpoint.
pub struct OpenAiModels {
    client: Client<OpenAIConfig>,
}

impl OpenAiModels {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);
        // No retries: a failed listing is cached as empty, not re-attempted.
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }

    /// `None` when the provider has no API key.
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let key = config.api_key.as_deref()?;
        Some(Self::new(&config.base_url, key))
    }
}

impl ModelSource for OpenAiModels {
    fn list_models(&self) -> BoxFuture<'_, Result<Vec<String>, FetchError>> {
        async move {
            let list: OpenAiListResponse = self.client.models().list_byot().await?;
            Ok(list
                .data
                .into_iter()
                .filter_map(|record| match record.id {
                    Some(Value::String(id)) => Some(id),
                    _ => None,
                })
                .collect())
        }
        .boxed()
    }
}

/// `/models` listing decoded loosely: records without a string `id` are skipped.
#[derive(Deserialize)]
struct OpenAiListResponse {
    data: Vec<OpenAiRecord>,
}

#[derive(Deserialize)]
struct OpenAiRecord {
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    data: Option<Vec<ModelRecord>>,
}

#[derive(Deserialize)]
struct ModelRecord {
    id: String,
}

/// Lists models with a single `GET {base_url}/models` against OpenRouter.
pub struct OpenRouterModels {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    http_referer: String,
}

impl OpenRouterModels {
    pub fn new(base_url: &str, api_key: &str, http_referer: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_referer: http_referer.to_string(),
        }
    }

    /// `None` when the provider has no API key.
    pub fn from_config(config: &ProviderConfig, http_referer: &str) -> Option<Self> {
        let key = config.api_key.as_deref()?;
        Some(Self::new(&config.base_url, key, http_referer))
    }
}

impl ModelSource for OpenRouterModels {
    fn list_models(&self) -> BoxFuture<'_, Result<Vec<String>, FetchError>> {
        async move {
            let url = format!("{}/models", self.base_url);
            debug!("GET {}", url);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", &self.http_referer)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }

            let body: ModelsResponse = response.json().await?;
            Ok(body
                .data
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.id)
                .collect())
        }
        .boxed()
    }
}

/// Fetch a provider's model list, sorted ascending. Never fails.
///
/// Without a source (no API key), OpenAI yields [`RECOMMENDED_MODELS`] and OpenRouter an empty list.
/// Any listing error is logged and yields an empty list.
pub async fn fetch_models(provider: Provider, source: Option<&dyn ModelSource>) -> Vec<String> {
    let Some(source) = source else {
        debug!("{} API key not set, skipping model fetch", provider);
        return match provider {
            Provider::OpenAi => RECOMMENDED_MODELS.iter().map(|m| m.to_string()).collect(),
            Provider::OpenRouter => Vec::new(),
        };
    };

    debug!("Fetching {} models", provider);
    match source.list_models().await {
        Ok(mut models) => {
            models.sort();
            debug!("Fetched {} {} models", models.len(), provider);
            models
        }
        Err(e) => {
            warn!("Failed to fetch {} models: {}", provider, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Failing;

    impl ModelSource for Failing {
        fn list_models(&self) -> BoxFuture<'_, Result<Vec<String>, FetchError>> {
            async { Err(FetchError::Other("connection reset".to_string())) }.boxed()
        }
    }

    struct Fixed(Vec<&'static str>);

    impl ModelSource for Fixed {
        fn list_models(&self) -> BoxFuture<'_, Result<Vec<String>, FetchError>> {
            let models = self.0.iter().map(|m| m.to_string()).collect();
            async move { Ok(models) }.boxed()
        }
    }

    #[tokio::test]
    async fn no_source_falls_back_per_provider() {
        assert_eq!(fetch_models(Provider::OpenAi, None).await, vec!["o4-mini", "o3"]);
        assert!(fetch_models(Provider::OpenRouter, None).await.is_empty());
    }

    #[tokio::test]
    async fn listing_error_yields_empty() {
        assert!(fetch_models(Provider::OpenAi, Some(&Failing)).await.is_empty());
    }

    #[tokio::test]
    async fn result_is_sorted() {
        let source = Fixed(vec!["a", "c", "b"]);
        assert_eq!(
            fetch_models(Provider::OpenRouter, Some(&source)).await,
            vec!["a", "b", "c"]
        );
    }

    #[tokio::test]
    async fn openrouter_sends_auth_and_referer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("http-referer", "https://example.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "z-ai/glm"}, {"id": "anthropic/claude"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = OpenRouterModels::new(
            &format!("{}/api/v1/", server.uri()),
            "sk-or-test",
            "https://example.test",
        );
        let models = fetch_models(Provider::OpenRouter, Some(&source)).await;
        assert_eq!(models, vec!["anthropic/claude", "z-ai/glm"]);
    }

    #[tokio::test]
    async fn openrouter_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = OpenRouterModels::new(&server.uri(), "bad", "https://example.test");
        let err = source.list_models().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 401));
        assert!(fetch_models(Provider::OpenRouter, Some(&source)).await.is_empty());
    }

    #[tokio::test]
    async fn openrouter_missing_data_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "list"})))
            .mount(&server)
            .await;

        let source = OpenRouterModels::new(&server.uri(), "sk-or-test", "https://example.test");
        assert_eq!(source.list_models().await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn openrouter_malformed_body_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let source = OpenRouterModels::new(&server.uri(), "sk-or-test", "https://example.test");
        assert!(matches!(source.list_models().await, Err(FetchError::Http(_))));
        assert!(fetch_models(Provider::OpenRouter, Some(&source)).await.is_empty());
    }

    #[tokio::test]
    async fn openai_lists_model_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"id": "gpt-4.1", "object": "model", "created": 1, "owned_by": "openai"},
                    {"id": "gpt-4.1-mini", "object": "model", "created": 2, "owned_by": "openai"},
                    {"id": "babbage-002", "object": "model", "created": 3, "owned_by": "system"}
                ]
            })))
            .mount(&server)
            .await;

        let source = OpenAiModels::new(&format!("{}/v1", server.uri()), "sk-test");
        let models = fetch_models(Provider::OpenAi, Some(&source)).await;
        assert_eq!(models, vec!["babbage-002", "gpt-4.1", "gpt-4.1-mini"]);
    }

    #[tokio::test]
    async fn openai_malformed_body_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let source = OpenAiModels::new(&format!("{}/v1", server.uri()), "sk-test");
        assert!(fetch_models(Provider::OpenAi, Some(&source)).await.is_empty());
    }

    #[tokio::test]
    async fn openai_skips_records_without_string_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [
                    {"id": "gpt-4.1", "object": "model", "created": 1, "owned_by": "openai"},
                    {"object": "model", "created": 2, "owned_by": "openai"},
                    {"id": 42, "object": "model"},
                    {"id": "babbage-002", "object": "model", "created": 3, "owned_by": "system"}
                ]
            })))
            .mount(&server)
            .await;

        let source = OpenAiModels::new(&format!("{}/v1", server.uri()), "sk-test");
        let models = fetch_models(Provider::OpenAi, Some(&source)).await;
        assert_eq!(models, vec!["babbage-002", "gpt-4.1"]);
    }

    /// Error statuses resolve to an empty list after exactly one request.
    async fn assert_openai_status_yields_empty_once(status: u16) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": "upstream failure",
                    "type": "server_error",
                    "param": null,
                    "code": null
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = OpenAiModels::new(&format!("{}/v1", server.uri()), "sk-test");
        let models = tokio::time::timeout(
            Duration::from_secs(3),
            fetch_models(Provider::OpenAi, Some(&source)),
        )
        .await
        .expect("listing should not retry");
        assert!(models.is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn openai_server_error_is_not_retried() {
        assert_openai_status_yields_empty_once(500).await;
    }

    #[tokio::test]
    async fn openai_rate_limit_is_not_retried() {
        assert_openai_status_yields_empty_once(429).await;
    }

    #[tokio::test]
    async fn openai_unauthorized_yields_empty() {
        assert_openai_status_yields_empty_once(401).await;
    }

    #[test]
    fn from_config_requires_key() {
        let config = ProviderConfig {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            key_source: None,
        };
        assert!(OpenRouterModels::from_config(&config, "https://example.test").is_none());
        assert!(OpenAiModels::from_config(&config).is_none());
    }
}
