use super::{ChatTurn, Conversation, LlmClient, truncate};
use crate::config::Config;
use crate::error::DraftError;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Minimal request/response structs for the Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Client for any service speaking the OpenAI-style `/chat/completions` protocol
/// (GitHub Models, Azure AI inference, OpenAI itself).
pub struct ChatCompletionsClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    temperature: f64,
}

impl ChatCompletionsClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(ChatCompletionsClient {
            client,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            temperature: cfg.temperature,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn call_chat(&self, req: &ChatRequest<'_>) -> Result<String, DraftError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DraftError::Authentication(
                "no API token configured; set GITHUB_TOKEN or pass --api-key".to_string(),
            )
        })?;

        let url = self.chat_url();
        log::info!("Calling model {:?} at {}", req.model, url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(req)
            .send()
            .map_err(|e| DraftError::Service(format!("failed to send request to {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            let detail = format!("HTTP {} - {}", status.as_u16(), text.trim());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    DraftError::Authentication(detail)
                }
                _ => DraftError::Service(detail),
            });
        }

        let chat_resp: ChatResponse = resp
            .json()
            .map_err(|e| DraftError::Service(format!("failed to parse response: {e}")))?;

        if let Some(usage) = &chat_resp.usage {
            log::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DraftError::Service("no choices returned".to_string()))
    }
}

impl LlmClient for ChatCompletionsClient {
    fn complete(&self, conversation: &Conversation) -> Result<String> {
        if let Some(last) = conversation.turns().last() {
            log::trace!("User prompt:\n{}", truncate(&last.content, 3000));
        }

        let req = ChatRequest {
            model: &self.model,
            messages: conversation.turns(),
            temperature: self.temperature,
            stream: false,
        };

        let content = self.call_chat(&req)?;
        Ok(content)
    }
}
