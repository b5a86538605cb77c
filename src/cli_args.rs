use crate::config::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use clap::Parser;
use std::path::PathBuf;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "commitdraft",
    version,
    about = "Draft a commit message for your staged changes with a chat-completion model"
)]
pub struct Cli {
    /// What the staged work is meant to accomplish (the ticket or task description)
    pub task: String,

    /// Repository to inspect
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Debug mode: print the assembled prompt instead of calling the model
    #[arg(long)]
    pub debug: bool,

    /// Model name to use
    #[arg(long, env = "COMMITDRAFT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the chat-completions service
    #[arg(long, env = "COMMITDRAFT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Sampling temperature
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// API token (otherwise uses GITHUB_TOKEN env var)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
