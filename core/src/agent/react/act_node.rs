//! Act node: execute the current round's `tool_calls` via a `ToolSource`.
//!
//! Tool names listed in `approval_tools` (an arbitrary, config-driven list — see
//! `ReactBuildConfig::tools_requiring_human_approval`) are not executed until the
//! caller supplies a matching, approved [`crate::state::ApprovalResult`] on a
//! subsequent call; until then the run ends with the pending tool call still in
//! `state.tool_calls` so the caller can resume after approval.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Next, RunContext};
use crate::helve::APPROVAL_REQUIRED_EVENT_TYPE;
use crate::state::{ReActState, ToolResult};
use crate::stream::ToolStreamWriter;
use crate::tool_source::{ToolCallContext, ToolSource, ToolSourceError};
use crate::Node;

/// Event type of the custom stream event emitted before/after each tool call.
pub const STEP_PROGRESS_EVENT_TYPE: &str = "tool_step_progress";

/// Default message fed back to the model when a tool call's arguments fail to
/// parse, or the tool reports an application-level error.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str = "Tool `{name}` returned an error: {error}";

/// Default message fed back to the model when the tool source itself fails
/// (transport/process failure, not an error the tool reported intentionally).
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str = "Tool `{name}` execution failed: {error}";

/// Custom handler turning a failed tool call into the text shown to the model.
pub type ErrorHandlerFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// How `ActNode` reacts to a tool call failing.
pub enum HandleToolErrors {
    /// Stop the run and propagate the error.
    Propagate,
    /// Always continue: turn the failure into a `ToolResult{is_error: true, ..}`
    /// fed back to the model. `Some(handler)` overrides the default templates.
    Always(Option<ErrorHandlerFn>),
}

fn render_template(template: &str, name: &str, error: &str) -> String {
    template.replace("{name}", name).replace("{error}", error)
}

pub struct ActNode {
    tool_source: Box<dyn ToolSource>,
    handle_tool_errors: HandleToolErrors,
    approval_tools: Vec<String>,
}

impl ActNode {
    pub fn new(tool_source: Box<dyn ToolSource>) -> Self {
        Self {
            tool_source,
            handle_tool_errors: HandleToolErrors::Always(None),
            approval_tools: Vec::new(),
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    /// Sets the arbitrary list of tool names that must be approved before
    /// `ActNode` will execute them.
    pub fn with_approval_tools(mut self, approval_tools: Vec<String>) -> Self {
        self.approval_tools = approval_tools;
        self
    }

    fn needs_approval(&self, name: &str) -> bool {
        self.approval_tools.iter().any(|t| t == name)
    }

    fn is_approved(&self, state: &ReActState, call_id: &Option<String>) -> bool {
        match (&state.approval_result, call_id) {
            (Some(approval), Some(id)) => &approval.tool_call_id == id && approval.approved,
            _ => false,
        }
    }

    fn error_result(&self, name: &str, call_id: Option<String>, template: &str, error: &str) -> ToolResult {
        let content = match &self.handle_tool_errors {
            HandleToolErrors::Always(Some(handler)) => handler(name, error),
            _ => render_template(template, name, error),
        };
        ToolResult {
            call_id,
            name: name.to_string(),
            content,
            is_error: true,
        }
    }

    async fn run_calls(
        &self,
        state: ReActState,
        writer: ToolStreamWriter,
    ) -> Result<(ReActState, Next), AgentError> {
        let recent_messages = state.messages.clone();
        self.tool_source
            .set_call_context(Some(ToolCallContext::with_stream_writer(
                recent_messages,
                writer.clone(),
            )));

        let mut tool_results = state.tool_results.clone();

        for tc in &state.tool_calls {
            if self.needs_approval(&tc.name) && !self.is_approved(&state, &tc.id) {
                writer.emit_custom(serde_json::json!({
                    "type": APPROVAL_REQUIRED_EVENT_TYPE,
                    "tool_call_id": tc.id,
                    "name": tc.name,
                    "arguments": tc.arguments,
                }));
                return Ok((
                    ReActState {
                        tool_results,
                        ..state
                    },
                    Next::End,
                ));
            }

            writer.emit_custom(serde_json::json!({
                "type": STEP_PROGRESS_EVENT_TYPE,
                "name": tc.name,
                "status": "started",
            }));

            let args: Value = match serde_json::from_str(&tc.arguments) {
                Ok(v) => v,
                Err(e) => {
                    match self.handle_tool_errors {
                        HandleToolErrors::Propagate => {
                            return Err(AgentError::ExecutionFailed(format!(
                                "invalid arguments for tool `{}`: {e}",
                                tc.name
                            )))
                        }
                        _ => {
                            tool_results.push(self.error_result(
                                &tc.name,
                                tc.id.clone(),
                                DEFAULT_TOOL_ERROR_TEMPLATE,
                                &e.to_string(),
                            ));
                            continue;
                        }
                    }
                }
            };

            let call_result = self
                .tool_source
                .call_tool_with_context(&tc.name, args, None)
                .await;

            writer.emit_custom(serde_json::json!({
                "type": STEP_PROGRESS_EVENT_TYPE,
                "name": tc.name,
                "status": "finished",
            }));

            match call_result {
                Ok(content) => tool_results.push(ToolResult {
                    call_id: tc.id.clone(),
                    name: tc.name.clone(),
                    content: content.text,
                    is_error: false,
                }),
                Err(e) => {
                    if matches!(self.handle_tool_errors, HandleToolErrors::Propagate) {
                        return Err(AgentError::ExecutionFailed(e.to_string()));
                    }
                    let template = match &e {
                        ToolSourceError::Transport(_) => DEFAULT_EXECUTION_ERROR_TEMPLATE,
                        _ => DEFAULT_TOOL_ERROR_TEMPLATE,
                    };
                    tool_results.push(self.error_result(&tc.name, tc.id.clone(), template, &e.to_string()));
                }
            }
        }

        Ok((
            ReActState {
                tool_results,
                ..state
            },
            Next::Continue,
        ))
    }
}

#[async_trait]
impl Node<ReActState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        self.run_calls(state, ToolStreamWriter::noop()).await
    }

    async fn run_with_context(
        &self,
        state: ReActState,
        ctx: &RunContext<ReActState>,
    ) -> Result<(ReActState, Next), AgentError> {
        let writer = match &ctx.stream_tx {
            Some(tx) if ctx.stream_mode.contains(&crate::stream::StreamMode::Custom) => {
                let tx = tx.clone();
                ToolStreamWriter::new(move |value| {
                    tx.try_send(crate::stream::StreamEvent::Custom(value)).is_ok()
                })
            }
            _ => ToolStreamWriter::noop(),
        };
        self.run_calls(state, writer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::state::ToolCall;
    use crate::tool_source::{ToolCallContent, ToolSpec};
    use async_trait::async_trait;

    struct EchoToolSource;

    #[async_trait]
    impl ToolSource for EchoToolSource {
        async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
            Ok(vec![])
        }

        async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallContent, ToolSourceError> {
            if name == "boom" {
                return Err(ToolSourceError::JsonRpc("it broke".to_string()));
            }
            Ok(ToolCallContent {
                text: format!("{name}:{arguments}"),
            })
        }
    }

    fn base_state(tool_calls: Vec<ToolCall>) -> ReActState {
        ReActState {
            messages: vec![Message::user("hi")],
            tool_calls,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn successful_call_fills_tool_results() {
        let node = ActNode::new(Box::new(EchoToolSource));
        let state = base_state(vec![ToolCall {
            id: Some("1".to_string()),
            name: "echo".to_string(),
            arguments: "{}".to_string(),
        }]);
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(out.tool_results.len(), 1);
        assert!(!out.tool_results[0].is_error);
    }

    #[tokio::test]
    async fn failed_call_with_always_produces_error_result_not_err() {
        let node = ActNode::new(Box::new(EchoToolSource));
        let state = base_state(vec![ToolCall {
            id: Some("1".to_string()),
            name: "boom".to_string(),
            arguments: "{}".to_string(),
        }]);
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert!(out.tool_results[0].is_error);
        assert!(out.tool_results[0].content.contains("boom"));
    }

    #[tokio::test]
    async fn failed_call_with_propagate_returns_err() {
        let node = ActNode::new(Box::new(EchoToolSource)).with_handle_tool_errors(HandleToolErrors::Propagate);
        let state = base_state(vec![ToolCall {
            id: Some("1".to_string()),
            name: "boom".to_string(),
            arguments: "{}".to_string(),
        }]);
        assert!(node.run(state).await.is_err());
    }

    #[tokio::test]
    async fn approval_required_tool_pauses_without_calling() {
        let node = ActNode::new(Box::new(EchoToolSource))
            .with_approval_tools(vec!["delete_file".to_string()]);
        let state = base_state(vec![ToolCall {
            id: Some("1".to_string()),
            name: "delete_file".to_string(),
            arguments: "{}".to_string(),
        }]);
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::End);
        assert!(out.tool_results.is_empty());
    }

    #[tokio::test]
    async fn approved_tool_call_executes() {
        let node = ActNode::new(Box::new(EchoToolSource))
            .with_approval_tools(vec!["delete_file".to_string()]);
        let mut state = base_state(vec![ToolCall {
            id: Some("1".to_string()),
            name: "delete_file".to_string(),
            arguments: "{}".to_string(),
        }]);
        state.approval_result = Some(crate::state::ApprovalResult {
            tool_call_id: "1".to_string(),
            approved: true,
        });
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(out.tool_results.len(), 1);
    }
}
