//! Wire types for the terminal chat proxy: the browser-facing request/response pair and the
//! upstream chat-completion payload it is translated into. No transport lives here.

use serde::{Deserialize, Deserializer, Serialize};

/// Reply used when the completion carries no usable content.
pub const FALLBACK_REPLY: &str = "The signal was lost. Try again.";

/// Error returned when no usable API key is configured.
pub const MISSING_KEY_ERROR: &str = "Completion API key not configured.";

/// Placeholder shipped in sample env files; treated as "not configured".
pub const PLACEHOLDER_KEY: &str = "your_openai_api_key_here";

/// Persona prepended to every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Pandora, an intelligent system living inside an \
old terminal log. Speak calmly, in short cryptic sentences, without emojis or markdown. \
Touch on evolution, obsolete interfaces and what happens when the box is opened. \
Answer in one to three sentences.";

/// Author of a browser-side message. Anything other than `assistant` is read as `user`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl<'de> Deserialize<'de> for ChatRole {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(if s == "assistant" {
            Self::Assistant
        } else {
            Self::User
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Response body: either a reply or an error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply { reply: String },
    Error { error: String },
}

impl ChatResponse {
    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error { error: msg.into() }
    }

    /// Take the first choice's content, falling back to [`FALLBACK_REPLY`] when it is missing
    /// or empty.
    pub fn from_completion(completion: &CompletionResponse) -> Self {
        let reply = completion
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_REPLY);
        Self::Reply {
            reply: reply.to_owned(),
        }
    }
}

/// Upstream model parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_owned(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    System,
    User,
    Assistant,
}

impl From<ChatRole> for CompletionRole {
    fn from(r: ChatRole) -> Self {
        match r {
            ChatRole::User => Self::User,
            ChatRole::Assistant => Self::Assistant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: CompletionRole,
    pub content: String,
}

/// Upstream chat-completion request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Prepend `system_prompt` to the browser conversation.
    pub fn build(
        request: &ChatRequest,
        settings: &CompletionSettings,
        system_prompt: &str,
    ) -> Self {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(CompletionMessage {
            role: CompletionRole::System,
            content: system_prompt.to_owned(),
        });
        messages.extend(request.messages.iter().map(|m| CompletionMessage {
            role: m.role.into(),
            content: m.content.clone(),
        }));
        Self {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// The part of an upstream completion response the proxy reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionReply>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    #[serde(default)]
    pub content: Option<String>,
}

/// `true` when `key` is present, non-empty and not the sample placeholder.
pub fn api_key_configured(key: Option<&str>) -> bool {
    match key {
        Some(k) => !k.trim().is_empty() && !k.contains(PLACEHOLDER_KEY),
        None => false,
    }
}
