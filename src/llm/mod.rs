pub mod openai;
pub mod prompt_builder;
pub mod prompts;

use anyhow::Result;
use serde::Serialize;

/// Who a conversation turn comes from, as the chat-completions API names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// The fixed three-turn exchange: persona, formatting rules, then the assembled prompt.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
}

impl Conversation {
    pub fn new(persona: &str, rules: &str, prompt: String) -> Self {
        Conversation {
            turns: vec![
                ChatTurn {
                    role: Role::System,
                    content: persona.to_owned(),
                },
                ChatTurn {
                    role: Role::System,
                    content: rules.to_owned(),
                },
                ChatTurn {
                    role: Role::User,
                    content: prompt,
                },
            ],
        }
    }

    /// Persona and commit rules from `prompts`, with `prompt` as the user turn.
    pub fn for_commit_message(prompt: String) -> Self {
        Self::new(prompts::PERSONA, prompts::COMMIT_RULES, prompt)
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

/// Trait for talking to a chat-completion backend.
pub trait LlmClient {
    /// Send the conversation once and return the first candidate's text.
    fn complete(&self, conversation: &Conversation) -> Result<String>;
}

/// Truncate long strings for debug logging.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let dropped = s[cut..].chars().count();
    format!("{}...\n[truncated {} chars]", &s[..cut], dropped)
}
