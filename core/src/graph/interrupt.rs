//! Human-in-the-loop interrupts: pausing a run for external input (e.g. tool approval).

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

/// Raised by a node to pause the run and hand control back to the caller.
///
/// Carries enough information for the caller to resume: which node raised it,
/// and an opaque payload (e.g. the pending tool call awaiting approval).
#[derive(Clone, Debug)]
pub struct Interrupt {
    /// Node id that raised the interrupt.
    pub node_id: String,
    /// Opaque payload shown to whoever resolves the interrupt.
    pub value: Value,
}

impl Interrupt {
    pub fn new(node_id: impl Into<String>, value: Value) -> Self {
        Self {
            node_id: node_id.into(),
            value,
        }
    }
}

/// What a [`InterruptHandler`] decides to do with a raised [`Interrupt`].
#[derive(Clone, Debug, PartialEq)]
pub enum GraphInterrupt {
    /// Resume immediately with the given resolution value, without pausing the run.
    Resolve(Value),
    /// Pause the run; the caller must resume later (e.g. via a new `invoke` call
    /// with `RunnableConfig::resume_from_node_id` set).
    Pause,
}

/// Decides how to handle an [`Interrupt`] raised by a node.
///
/// Set via [`super::StateGraph::with_interrupt_handler`]. The default
/// ([`DefaultInterruptHandler`]) always pauses, which is correct for
/// synchronous human approval flows where the caller drives resumption.
#[async_trait]
pub trait InterruptHandler: Send + Sync {
    async fn handle(&self, interrupt: &Interrupt) -> GraphInterrupt;
}

/// Always pauses the run; the caller is responsible for resuming it.
pub struct DefaultInterruptHandler;

#[async_trait]
impl InterruptHandler for DefaultInterruptHandler {
    async fn handle(&self, _interrupt: &Interrupt) -> GraphInterrupt {
        GraphInterrupt::Pause
    }
}
