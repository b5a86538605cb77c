mod cli_args;
mod config;
mod error;
mod git;
mod llm;
mod logging;
mod pipeline;
mod setup;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli_args::Cli;
use crate::config::Config;
use crate::git::GitCli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(error::exit_code_for(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let repo = resolve_repo(&cli.repo)?;

    if cli.debug {
        let prompt = pipeline::assemble_prompt(&GitCli, &repo, &cli.task)?;
        println!("{}", prompt.trim_end());
        return Ok(());
    }

    let cfg = Config::from_cli(cli)?;
    let client = setup::build_llm_client(&cfg)?;

    let message = pipeline::draft_commit_message(&GitCli, client.as_ref(), &repo, &cli.task)?;
    println!("{}", message.trim_end());

    Ok(())
}

/// Staged file paths are joined onto this, so it has to be absolute.
fn resolve_repo(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("failed to resolve repository path {}", path.display()))
}
