pub mod api_key;
pub mod app;
pub mod cli;
pub mod config;
pub mod models;
pub mod paths;
pub mod util;
