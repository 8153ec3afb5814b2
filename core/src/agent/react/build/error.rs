//! Error type for the config-driven builder (`build_react_run_context`, `build_react_runner`).

use crate::error::AgentError;
use crate::graph::CompilationError;

#[derive(Debug, thiserror::Error)]
pub enum BuildRunnerError {
    #[error("failed to build run context: {0}")]
    Context(#[from] AgentError),

    #[error("failed to compile graph: {0}")]
    Compilation(#[from] CompilationError),

    #[error("failed to resolve a default LLM client: {0}")]
    MissingLlmConfig(String),
}
