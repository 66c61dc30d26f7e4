//! Provider selector and built-in recommended models (no dependencies on cache or API).

use std::fmt;

/// Models always treated as supported on the primary provider, without a network check.
pub const RECOMMENDED_MODELS: &[&str] = &["o4-mini", "o3"];

/// Remote inference API whose model list is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Provider {
    /// OpenAI API (primary).
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// OpenRouter API (alternate).
    #[value(name = "openrouter")]
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::OpenRouter];

    /// Lowercase identifier used in file names and CLI values.
    pub fn slug(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::OpenRouter => "openrouter",
        }
    }

    /// Whether `model` is in the built-in recommended list for this provider.
    pub fn is_recommended(self, model: &str) -> bool {
        self == Provider::OpenAi && RECOMMENDED_MODELS.contains(&model)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::OpenAi => "OpenAI",
            Provider::OpenRouter => "OpenRouter",
        })
    }
}
