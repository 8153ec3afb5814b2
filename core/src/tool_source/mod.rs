//! Tool sourcing: the trait agents call through, plus concrete sources.
//!
//! [`ToolSource`] is the seam between the reasoning loop (`ActNode`) and wherever
//! tools actually live — an in-process registry, an MCP server, or (for shell
//! execution) a sandbox session. Nodes only depend on this trait; they never know
//! whether a tool runs locally or across a container boundary.
//!
//! # Main types
//!
//! - [`ToolSource`]: `list_tools` / `call_tool` / `call_tool_with_context`.
//! - [`ToolSpec`], [`ToolCallContent`], [`ToolSourceError`]: shared result/error shapes.
//! - [`ToolCallContext`]: per-step context (recent messages, stream writer, thread/user id).
//! - [`McpToolSource`]: MCP server over stdio or Streamable HTTP.
//! - [`BashToolsSource`]: sandboxed shell execution via the session manager.

mod bash_tools_source;
mod composite;
mod context;
pub mod mcp;
mod mock;

pub use bash_tools_source::{BashToolsSource, TOOL_BASH};
pub use composite::CompositeToolSource;
pub use context::ToolCallContext;
pub use mcp::{McpServerConfig, McpToolSource, TemplateContext, TemplateError};
pub use mock::MockToolSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Description of a callable tool: name, human-readable description, and JSON Schema for arguments.
///
/// Aligned with MCP's `tools/list` shape so MCP-sourced tools round-trip without translation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Text result of one tool call. Tool output is always flattened to text for the
/// model; structured results (e.g. MCP `structuredContent`) are JSON-encoded first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// Tool name not found in this source's registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed to parse or did not match the tool's schema.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool itself reported a JSON-RPC error (MCP `error` field).
    #[error("tool error: {0}")]
    JsonRpc(String),

    /// Transport-level failure: process spawn, HTTP, timeout, malformed response.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Uniform seam between the reasoning loop and wherever tools live.
///
/// Implementors: an in-process [`ToolRegistry`](crate::tools::ToolRegistry) via
/// [`AggregateToolSource`](crate::tools::AggregateToolSource), [`McpToolSource`], or
/// [`BashToolsSource`] (which forwards to a sandbox session). `ActNode` calls
/// `set_call_context` once per step before executing any tool calls, then
/// `call_tool_with_context` for each call; sources that don't need context can
/// rely on the default forwarding implementation.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// Lists tools this source currently exposes.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Calls a tool by name with no per-step context.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;

    /// Calls a tool by name with optional per-step context (recent messages, stream writer).
    ///
    /// Default implementation ignores `ctx` and forwards to [`ToolSource::call_tool`];
    /// override when the source has tools that read the context (e.g. short-term memory).
    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call_tool(name, arguments).await
    }

    /// Stores the per-step context for sources whose tools need it at call time.
    ///
    /// Default is a no-op. `ActNode` calls this once per step before dispatching
    /// tool calls when streaming or short-term memory is in use.
    fn set_call_context(&self, _ctx: Option<ToolCallContext>) {}
}
