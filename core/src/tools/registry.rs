//! In-process tool registry: name → `Box<dyn Tool>`.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::Tool;

/// Plain, synchronously-built map of tools by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::UnknownTool(name.to_string()))?;
        tool.call(args, ctx).await
    }
}

/// `ToolRegistry` behind an async `RwLock`, for concurrent registration/lookup.
#[derive(Default)]
pub struct ToolRegistryLocked {
    inner: RwLock<ToolRegistry>,
}

impl ToolRegistryLocked {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, tool: Box<dyn Tool>) {
        self.inner.write().await.register(tool);
    }

    pub async fn list(&self) -> Vec<ToolSpec> {
        self.inner.read().await.list()
    }

    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.inner.read().await.call(name, args, ctx).await
    }
}
