use crate::git::StagedChangeProvider;
use crate::llm::prompt_builder;
use crate::llm::{Conversation, LlmClient};
use anyhow::{Context, Result};
use std::path::Path;

/// Gather the staged diff, file list and indexed contents, and compose the user prompt.
///
/// The diff is read first: an empty staging area fails here with
/// `EmptyChangeSet` before any other git query runs.
pub fn assemble_prompt(
    provider: &dyn StagedChangeProvider,
    repo: &Path,
    task: &str,
) -> Result<String> {
    let diff = provider.staged_diff(repo)?;
    let paths = provider.staged_files(repo)?;

    let mut contents = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = provider
            .indexed_content(path)
            .with_context(|| format!("failed to read staged content of {}", path.display()))?;
        contents.push(content);
    }

    let changed_files = prompt_builder::changed_files_block(&paths, &contents);
    Ok(prompt_builder::build_prompt(task, &changed_files, &diff))
}

/// Assemble the prompt and ask the model for a commit message. One model call, no retries.
pub fn draft_commit_message(
    provider: &dyn StagedChangeProvider,
    client: &dyn LlmClient,
    repo: &Path,
    task: &str,
) -> Result<String> {
    let prompt = assemble_prompt(provider, repo, task)?;
    let conversation = Conversation::for_commit_message(prompt);
    client.complete(&conversation)
}
