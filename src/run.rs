//! Application run: logger init and command dispatch.

use std::io;

use clap::CommandFactory;

use crate::cli::{self, Args, Commands, ConfigSubcommand};
use model_check::core;
use model_check::core::models::ModelCache;

/// Initialize env_logger on stderr, honoring `RUST_LOG` over the -v/-q flags.
pub fn init_logger(args: &Args) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .try_init()
        .ok();
}

/// Run the parsed command. Returns the process exit code.
pub async fn run(args: Args) -> i32 {
    match args.command {
        Commands::Check { model, provider } => {
            let cache = ModelCache::new(&core::config::load());
            if core::cli::run_check(&cache, &model, provider).await {
                0
            } else {
                1
            }
        }
        Commands::Models { provider, query } => {
            let cache = ModelCache::new(&core::config::load());
            core::cli::run_models(&cache, provider, query.as_deref()).await;
            0
        }
        Commands::Recommended => {
            core::cli::run_recommended();
            0
        }
        Commands::Config { subcommand } => {
            match subcommand {
                None => core::cli::run_config(&core::config::load()),
                Some(ConfigSubcommand::SetApiKey { provider, key }) => {
                    core::cli::run_config_set_api_key(provider, key)
                }
            }
            0
        }
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            cli::generate(shell, &mut cmd, core::app::NAME, &mut io::stdout());
            0
        }
    }
}
