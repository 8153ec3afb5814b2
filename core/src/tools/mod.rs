//! Concrete tools registered behind a `ToolSource`: in-process registry, MCP
//! adapter, and the built-ins a Converse agent ships with (bash, image generation).

mod aggregate_source;
mod image_generation;
mod mcp_adapter;
mod registry;
mod r#trait;

pub use aggregate_source::AggregateToolSource;
pub use image_generation::{ImageGenerationTool, TOOL_IMAGE_GENERATION};
pub use mcp_adapter::{register_mcp_tools, McpToolAdapter};
pub use r#trait::Tool;
pub use registry::{ToolRegistry, ToolRegistryLocked};
