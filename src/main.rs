//! # model-check
//!
//! Command-line front end for the model availability cache: checks whether a
//! model name is served by OpenAI or OpenRouter before a real request is made.

mod cli;
mod run;

use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    let code = run::run(args).await;
    std::process::exit(code);
}
