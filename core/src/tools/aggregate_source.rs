//! Aggregates registered tools behind the `ToolSource` trait.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::registry::ToolRegistryLocked;
use crate::tools::Tool;

/// Implements `ToolSource` by delegating to an internal [`ToolRegistryLocked`].
///
/// Used by every composite tool source (bash, MCP, memory) to turn a handful
/// of concrete [`Tool`]s into the single [`ToolSource`] that `ActNode` expects.
#[derive(Default)]
pub struct AggregateToolSource {
    registry: ToolRegistryLocked,
    context: RwLock<Option<ToolCallContext>>,
}

impl AggregateToolSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_async(&self, tool: Box<dyn Tool>) {
        self.registry.register(tool).await;
    }

    pub fn register_sync(&self, tool: Box<dyn Tool>) {
        // Registration happens before any concurrent readers exist in practice
        // (build time); block_in_place keeps the call-site synchronous.
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(self.registry.register(tool))
        });
    }
}

#[async_trait]
impl ToolSource for AggregateToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.registry.list().await)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let ctx = self.context.read().await.clone();
        self.registry.call(name, arguments, ctx.as_ref()).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.registry.call(name, arguments, ctx).await
    }

    fn set_call_context(&self, ctx: Option<ToolCallContext>) {
        // Best-effort: ActNode calls this from an async context, so the lock is
        // never actually contended long enough to block.
        if let Ok(mut guard) = self.context.try_write() {
            *guard = ctx;
        }
    }
}
