//! The `Agent` trait: the simplest unit of work in this crate.
//!
//! Most agents in this codebase are built as a [`crate::graph::StateGraph`]
//! (see [`crate::agent::react`]) rather than a hand-written `Agent` impl, but
//! the trait remains the common seam for anything that takes a state and
//! returns an updated state.

use async_trait::async_trait;

use crate::error::AgentError;

/// A single named step that transforms state.
#[async_trait]
pub trait Agent: Send + Sync {
    type State: Send;

    /// Human-readable identifier, used in logs and traces.
    fn name(&self) -> &str;

    /// Runs one step, consuming and returning the state.
    async fn run(&self, state: Self::State) -> Result<Self::State, AgentError>;
}
