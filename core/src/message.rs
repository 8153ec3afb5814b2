//! Conversation message type shared by state, LLM clients, and persistence.

use serde::{Deserialize, Serialize};

/// One turn in a conversation.
///
/// Kept deliberately small: the ReAct loop only ever needs to distinguish who
/// said what. Tool calls and tool results live on [`crate::state::ReActState`]
/// (`tool_calls` / `tool_results`), not as a `Message` variant, since they are
/// structured data the graph manipulates rather than free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(content.into())
    }

    /// Text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Message::System(c) | Message::User(c) | Message::Assistant(c) => c,
        }
    }

    /// Role string matching OpenAI's `role` field ("system" / "user" / "assistant").
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
        }
    }
}
