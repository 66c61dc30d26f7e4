//! Model availability: provider listing, memoized per-provider cache, and support checks.

mod cache;
mod fetch;
mod provider;

pub use cache::{MODEL_LIST_TIMEOUT, ModelCache};
pub use fetch::{FetchError, ModelSource, OpenAiModels, OpenRouterModels, fetch_models};
pub use provider::{Provider, RECOMMENDED_MODELS};
