//! Fixed-response `ToolSource` for tests and examples.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Returns a fixed list of tools and a fixed call result regardless of which tool
/// or arguments are passed. Use [`MockToolSource::get_time_example`] for a ready-made
/// single-tool source, or [`MockToolSource::new`] for custom tools/result.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    call_result: String,
}

impl MockToolSource {
    pub fn new(tools: Vec<ToolSpec>, call_result: String) -> Self {
        Self { tools, call_result }
    }

    /// One tool, `get_time`, returning a fixed timestamp.
    pub fn get_time_example() -> Self {
        Self::new(
            vec![ToolSpec {
                name: "get_time".to_string(),
                description: Some("Get current time.".to_string()),
                input_schema: json!({ "type": "object", "properties": {} }),
            }],
            "2025-01-29 12:00:00".to_string(),
        )
    }

    /// Overrides the fixed call result.
    pub fn with_call_result(mut self, result: String) -> Self {
        self.call_result = result;
        self
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        _name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        Ok(ToolCallContent {
            text: self.call_result.clone(),
        })
    }
}
