//! Observe node: fold this round's tool results into the conversation.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Next;
use crate::message::Message;
use crate::state::ReActState;
use crate::Node;

/// Merges `tool_results` into `messages` as user-role turns the model can read
/// on its next `think` step, then clears `tool_calls`/`tool_results` and bumps
/// `turn_count`.
///
/// `with_loop()` is the only constructor: the minimal ReAct chain always loops
/// back to `think` via `compress` after observing (see `ReactRunner::new`).
pub struct ObserveNode;

impl ObserveNode {
    pub fn with_loop() -> Self {
        Self
    }
}

fn format_tool_result(result: &crate::state::ToolResult) -> String {
    if result.is_error {
        format!("Tool {} errored: {}", result.name, result.content)
    } else {
        format!("Tool {} returned: {}", result.name, result.content)
    }
}

#[async_trait]
impl Node<ReActState> for ObserveNode {
    fn id(&self) -> &str {
        "observe"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let mut messages = state.messages;
        for result in &state.tool_results {
            messages.push(Message::User(format_tool_result(result)));
        }

        Ok((
            ReActState {
                messages,
                tool_calls: Vec::new(),
                tool_results: Vec::new(),
                turn_count: state.turn_count + 1,
                approval_result: None,
                usage: state.usage,
                total_usage: state.total_usage,
                message_count_after_last_think: state.message_count_after_last_think,
            },
            Next::Continue,
        ))
    }
}
