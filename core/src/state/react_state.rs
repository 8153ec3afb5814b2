//! State threaded through the ReAct graph (think → act → observe → compress).

use serde::{Deserialize, Serialize};

use crate::llm::LlmUsage;
use crate::message::Message;

/// A single tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back in the tool result. `None` for
    /// providers that don't assign one (the mock client, some local models).
    pub id: Option<String>,
    pub name: String,
    /// Raw JSON arguments as returned by the model (not yet parsed).
    pub arguments: String,
}

/// Outcome of executing one [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: Option<String>,
    pub name: String,
    /// Text handed back to the model. Always populated, even on error (see
    /// `ActNode`'s error-handling templates) so the loop can continue.
    pub content: String,
    pub is_error: bool,
}

/// A pending or resolved human-approval decision for a gated tool call.
///
/// Set by the caller when resuming a run that was paused with
/// `RunPaused{pending tool call}`; consumed by `ActNode` on the next step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResult {
    pub tool_call_id: String,
    pub approved: bool,
}

/// State for the minimal ReAct loop: conversation so far, the current round's
/// tool calls/results, and bookkeeping the loop needs across rounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReActState {
    pub messages: Vec<Message>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolResult>,
    pub turn_count: u32,
    pub approval_result: Option<ApprovalResult>,
    /// Usage for the most recent `think` call only.
    pub usage: Option<LlmUsage>,
    /// Usage accumulated across all `think` calls in this run.
    pub total_usage: Option<LlmUsage>,
    /// `messages.len()` right after the last `think` step; used by compaction
    /// to avoid summarising content the model hasn't seen yet.
    pub message_count_after_last_think: Option<usize>,
}

impl ReActState {
    /// The most recent assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(content) => Some(content.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_empty() {
        let state = ReActState::default();
        assert!(state.messages.is_empty());
        assert!(state.tool_calls.is_empty());
        assert_eq!(state.turn_count, 0);
    }

    #[test]
    fn last_assistant_reply_finds_most_recent() {
        let state = ReActState {
            messages: vec![
                Message::user("hi"),
                Message::assistant("first"),
                Message::user("more"),
                Message::assistant("second"),
            ],
            ..Default::default()
        };
        assert_eq!(state.last_assistant_reply(), Some("second"));
    }

    #[test]
    fn last_assistant_reply_none_when_absent() {
        let state = ReActState {
            messages: vec![Message::user("hi")],
            ..Default::default()
        };
        assert_eq!(state.last_assistant_reply(), None);
    }
}
