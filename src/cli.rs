//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use model_check::core::models::Provider;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  model-check check gpt-4.1                     Check a model against OpenAI
  model-check check openai/o3 -P openrouter     Check a model against OpenRouter
  model-check models --query mini               List available models matching 'mini'
  model-check recommended                       List built-in recommended models
  model-check config                            Show config paths and API key status
  model-check completions bash                  Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Check model names against the models a provider actually serves",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a model is likely supported (exit code 1 if not)
    Check {
        /// Model ID (e.g. gpt-4.1 or openai/o3)
        model: String,
        #[arg(short = 'P', long, value_enum, default_value = "openai")]
        provider: Provider,
    },
    /// List available models
    Models {
        #[arg(short = 'P', long, value_enum, default_value = "openai")]
        provider: Provider,
        /// Filter models by id
        #[arg(long)]
        query: Option<String>,
    },
    /// List built-in recommended models (always allowed on OpenAI)
    Recommended,
    /// Show config paths and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store a provider API key in the config directory (reads stdin if KEY is omitted)
    SetApiKey {
        #[arg(short = 'P', long, value_enum, default_value = "openai")]
        provider: Provider,
        /// API key
        key: Option<String>,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
