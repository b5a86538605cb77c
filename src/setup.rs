use crate::config::Config;
use crate::llm::openai::ChatCompletionsClient;
use crate::llm::{Conversation, LlmClient};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::time::Duration;

/// Build the LLM client from the resolved config. Called only once a prompt
/// is ready to send, so debug mode never needs a credential.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn LlmClient>> {
    debug!("Using ChatCompletionsClient: {cfg:?}");

    let client = ChatCompletionsClient::new(cfg)?;
    Ok(Box::new(WithSpinner { inner: client }))
}

/// Shows a spinner on stderr while the wrapped client waits on the service.
struct WithSpinner<C> {
    inner: C,
}

impl<C: LlmClient> LlmClient for WithSpinner<C> {
    fn complete(&self, conversation: &Conversation) -> Result<String> {
        let style = ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/", "-"])
            .template("{spinner:.blue} {msg}")
            .context("failed to create progress bar style")?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message("Generating commit message...");
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = self.inner.complete(conversation);
        pb.finish_and_clear();
        result
    }
}
