//! Fixed-response `LlmClient` for tests and examples: no network calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;

use super::{LlmClient, LlmResponse};

/// One scripted turn: content plus the tool calls the model "decides" to make.
#[derive(Clone, Debug)]
struct ScriptedTurn {
    content: String,
    tool_calls: Vec<ToolCall>,
}

/// Replays a fixed sequence of responses, one per call to `invoke`. The last
/// turn in the script repeats once the sequence is exhausted.
///
/// Useful for exercising the think → act → observe loop without a live
/// provider: `first_tools_then_end` models one round of tool use followed by
/// a final answer; `with_no_tool_calls` models a model that never calls tools.
pub struct MockLlm {
    script: Vec<ScriptedTurn>,
    call_count: AtomicUsize,
}

impl MockLlm {
    fn new(script: Vec<ScriptedTurn>) -> Self {
        Self {
            script,
            call_count: AtomicUsize::new(0),
        }
    }

    /// First call returns a single tool call (`get_time`, no arguments); every
    /// call after that returns a plain final answer with no tool calls.
    pub fn first_tools_then_end() -> Self {
        Self::new(vec![
            ScriptedTurn {
                content: String::new(),
                tool_calls: vec![ToolCall {
                    id: Some("call_1".to_string()),
                    name: "get_time".to_string(),
                    arguments: "{}".to_string(),
                }],
            },
            ScriptedTurn {
                content: "Here is the answer.".to_string(),
                tool_calls: vec![],
            },
        ])
    }

    /// Every call returns `text` with no tool calls: the loop ends after one think step.
    pub fn with_no_tool_calls(text: impl Into<String>) -> Self {
        Self::new(vec![ScriptedTurn {
            content: text.into(),
            tool_calls: vec![],
        }])
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        let turn = self
            .script
            .get(idx)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(ScriptedTurn {
                content: String::new(),
                tool_calls: vec![],
            });
        Ok(LlmResponse {
            content: turn.content,
            tool_calls: turn.tool_calls,
            usage: None,
        })
    }
}
