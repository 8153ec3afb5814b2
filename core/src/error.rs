//! Crate-wide error type for node execution and agent building.

use thiserror::Error;

/// Error returned by [`crate::graph::Node::run`] and friends.
///
/// Kept as a single catch-all variant on purpose: nodes, the LLM client, tool
/// sources, and the build layer all wrap their own typed errors (e.g.
/// [`crate::memory::CheckpointError`], [`crate::tool_source::ToolSourceError`])
/// and flatten to this at the point they cross into graph execution, via
/// `.map_err(|e| AgentError::ExecutionFailed(e.to_string()))` or `#[from]`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<crate::graph::CompilationError> for AgentError {
    fn from(e: crate::graph::CompilationError) -> Self {
        AgentError::ExecutionFailed(e.to_string())
    }
}
