//! Routes tool calls across several `ToolSource`s by name.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

/// Merges several tool sources (MCP servers, sandboxed bash, built-ins) into one.
///
/// Built by calling `list_tools` on each source once at construction time and
/// indexing tool name to source; later calls route directly rather than
/// guessing from error variants.
pub struct CompositeToolSource {
    sources: Vec<Box<dyn ToolSource>>,
    specs: Vec<ToolSpec>,
    owner: HashMap<String, usize>,
}

impl CompositeToolSource {
    pub async fn new(sources: Vec<Box<dyn ToolSource>>) -> Result<Self, ToolSourceError> {
        let mut specs = Vec::new();
        let mut owner = HashMap::new();
        for (idx, source) in sources.iter().enumerate() {
            for spec in source.list_tools().await? {
                owner.insert(spec.name.clone(), idx);
                specs.push(spec);
            }
        }
        Ok(Self {
            sources,
            specs,
            owner,
        })
    }
}

#[async_trait]
impl ToolSource for CompositeToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.specs.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call_tool_with_context(name, arguments, None).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let idx = *self
            .owner
            .get(name)
            .ok_or_else(|| ToolSourceError::UnknownTool(name.to_string()))?;
        self.sources[idx]
            .call_tool_with_context(name, arguments, ctx)
            .await
    }

    fn set_call_context(&self, ctx: Option<ToolCallContext>) {
        for source in &self.sources {
            source.set_call_context(ctx.clone());
        }
    }
}
