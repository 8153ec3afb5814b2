//! Bash tool source: runs shell commands inside the caller's sandbox session.
//!
//! Exposes a single tool, `bash`, whose execution is delegated to
//! [`SandboxManager`]/[`SandboxClient`] rather than the host shell — the
//! session's container is created (or restarted) on first use and reused for
//! the life of the run.

use async_trait::async_trait;
use serde_json::Value;

use crate::sandbox::{ExecRequest, SandboxClient, SandboxManager};
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

/// Tool name: run a shell command inside the session's sandbox.
pub const TOOL_BASH: &str = "bash";

/// Exposes sandboxed shell execution as one tool: `bash`.
pub struct BashToolsSource {
    manager: std::sync::Arc<SandboxManager>,
    session_id: String,
    agent_name: String,
    image: Option<String>,
}

impl BashToolsSource {
    pub fn new(
        manager: std::sync::Arc<SandboxManager>,
        session_id: impl Into<String>,
        agent_name: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            manager,
            session_id: session_id.into(),
            agent_name: agent_name.into(),
            image,
        }
    }

    fn spec() -> ToolSpec {
        ToolSpec {
            name: TOOL_BASH.to_string(),
            description: Some(
                "Run a shell command in an isolated sandbox scoped to this session.".to_string(),
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {"type": "string"},
                    "timeout_seconds": {"type": "integer"},
                    "workdir": {"type": "string"},
                },
                "required": ["command"],
            }),
        }
    }
}

#[async_trait]
impl ToolSource for BashToolsSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![Self::spec()])
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if name != TOOL_BASH {
            return Err(ToolSourceError::UnknownTool(name.to_string()));
        }
        let command = arguments
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidArguments("missing \"command\"".to_string()))?
            .to_string();
        let timeout_seconds = arguments.get("timeout_seconds").and_then(|v| v.as_u64());
        let workdir = arguments
            .get("workdir")
            .and_then(|v| v.as_str())
            .map(String::from);

        let handle = self
            .manager
            .create_or_get(&self.session_id, self.image.as_deref(), &self.agent_name)
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
        let client = SandboxClient::new(&handle);
        let result = client
            .exec_bash(ExecRequest {
                command: Some(command),
                timeout_seconds,
                workdir,
                ..Default::default()
            })
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;

        let mut text = result.stdout;
        if !result.stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str("stderr: ");
            text.push_str(&result.stderr);
        }
        if result.exit_code != 0 {
            text.push_str(&format!("\n(exit code {})", result.exit_code));
        }
        Ok(ToolCallContent { text })
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call_tool(name, arguments).await
    }
}
