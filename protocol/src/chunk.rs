//! Converse chunk taxonomy: the typed events an agent run emits to its callback
//! and, ultimately, to the SSE response. Distinct from [`crate::event::ProtocolEvent`],
//! which is the graph-trace wire shape for the WebSocket transport; this enum is the
//! run-level vocabulary (`run_started` … `run_completed`) described by the HTTP surface.

use serde::Serialize;
use serde_json::Value;

/// One tool call the model asked to execute.
#[derive(Clone, Debug, Serialize)]
pub struct ToolCallDescriptor {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Why a run failed.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunFailureReason {
    StepLimit,
    ProviderError,
    Other,
}

/// A single emitted event in a run's chunk stream. Every run starts with exactly one
/// `RunStarted` and ends with exactly one of `RunCompleted`/`RunPaused`/`RunFailed`/
/// `RunCancelled` (see protocol §4.2's canonical ordering).
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConverseChunk {
    RunStarted {
        run_id: String,
    },
    MessageDelta {
        message_id: String,
        delta: String,
    },
    MessageCompleted {
        message_id: String,
        content: String,
    },
    ToolCallRequested {
        tool_call: ToolCallDescriptor,
    },
    ToolCallCompleted {
        tool_call_id: String,
        result: Option<Value>,
        error: Option<String>,
    },
    ReasoningDelta {
        delta: String,
    },
    ReasoningCompleted {
        content: String,
    },
    Error {
        message: String,
    },
    RunCompleted {
        run_id: String,
    },
    RunPaused {
        run_id: String,
        pending_tool_call: ToolCallDescriptor,
    },
    RunFailed {
        run_id: String,
        reason: RunFailureReason,
        message: String,
    },
    RunCancelled {
        run_id: String,
    },
}

impl ConverseChunk {
    /// The SSE `event:` field: the chunk's `type` tag (e.g. `"run_started"`).
    pub fn event_name(&self) -> &'static str {
        match self {
            ConverseChunk::RunStarted { .. } => "run_started",
            ConverseChunk::MessageDelta { .. } => "message_delta",
            ConverseChunk::MessageCompleted { .. } => "message_completed",
            ConverseChunk::ToolCallRequested { .. } => "tool_call_requested",
            ConverseChunk::ToolCallCompleted { .. } => "tool_call_completed",
            ConverseChunk::ReasoningDelta { .. } => "reasoning_delta",
            ConverseChunk::ReasoningCompleted { .. } => "reasoning_completed",
            ConverseChunk::Error { .. } => "error",
            ConverseChunk::RunCompleted { .. } => "run_completed",
            ConverseChunk::RunPaused { .. } => "run_paused",
            ConverseChunk::RunFailed { .. } => "run_failed",
            ConverseChunk::RunCancelled { .. } => "run_cancelled",
        }
    }

    /// True for the four terminal variants; a run's stream ends at the first one emitted.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConverseChunk::RunCompleted { .. }
                | ConverseChunk::RunPaused { .. }
                | ConverseChunk::RunFailed { .. }
                | ConverseChunk::RunCancelled { .. }
        )
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
