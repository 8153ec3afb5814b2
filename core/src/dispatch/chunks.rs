//! Maps `StreamEvent<ReActState>` (the ReAct loop's internal streaming vocabulary) onto
//! `ConverseChunk` (the run-level vocabulary the SSE gateway serializes). Kept as a small
//! stateful mapper rather than a pure function because a few chunks (message id, the
//! paused-tool-call marker) need state carried across events within one run.

use stream_event::{ConverseChunk, RunFailureReason, ToolCallDescriptor};

use crate::agent::react::RunError;
use crate::helve::APPROVAL_REQUIRED_EVENT_TYPE;
use crate::state::ReActState;
use crate::stream::StreamEvent;

pub struct ChunkMapper {
    run_id: String,
    message_id: String,
    message_started: bool,
    message_text: String,
    /// Set once the run pauses for human approval; `finish_ok`/`finish_err` are skipped
    /// when this is set, since the terminal chunk was already emitted from `on_event`.
    paused_tool_call: Option<ToolCallDescriptor>,
}

impl ChunkMapper {
    pub fn new(run_id: String) -> Self {
        let message_id = format!("{run_id}-msg-1");
        Self {
            run_id,
            message_id,
            message_started: false,
            message_text: String::new(),
            paused_tool_call: None,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused_tool_call.is_some()
    }

    pub fn start(&mut self) -> Vec<ConverseChunk> {
        vec![ConverseChunk::RunStarted {
            run_id: self.run_id.clone(),
        }]
    }

    pub fn on_event(&mut self, event: StreamEvent<ReActState>) -> Vec<ConverseChunk> {
        match event {
            StreamEvent::Messages { chunk, metadata } if metadata.graph_node == "think" => {
                self.message_started = true;
                self.message_text.push_str(&chunk.content);
                vec![ConverseChunk::MessageDelta {
                    message_id: self.message_id.clone(),
                    delta: chunk.content,
                }]
            }
            StreamEvent::ToolCall {
                call_id,
                name,
                arguments,
            } => vec![ConverseChunk::ToolCallRequested {
                tool_call: ToolCallDescriptor {
                    id: call_id.unwrap_or_default(),
                    name,
                    arguments,
                },
            }],
            StreamEvent::Custom(value) => self.on_custom(value),
            _ => Vec::new(),
        }
    }

    fn on_custom(&mut self, value: serde_json::Value) -> Vec<ConverseChunk> {
        let Some(event_type) = value.get("type").and_then(|v| v.as_str()) else {
            return Vec::new();
        };
        if event_type == APPROVAL_REQUIRED_EVENT_TYPE {
            let descriptor = ToolCallDescriptor {
                id: value
                    .get("tool_call_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                name: value
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                arguments: value.get("arguments").cloned().unwrap_or(serde_json::Value::Null),
            };
            self.paused_tool_call = Some(descriptor.clone());
            return vec![ConverseChunk::RunPaused {
                run_id: self.run_id.clone(),
                pending_tool_call: descriptor,
            }];
        }
        if event_type == crate::agent::react::STEP_PROGRESS_EVENT_TYPE {
            let status = value.get("status").and_then(|v| v.as_str()).unwrap_or("");
            if status == "finished" {
                let name = value.get("name").and_then(|v| v.as_str()).unwrap_or_default();
                return vec![ConverseChunk::ToolCallCompleted {
                    tool_call_id: name.to_string(),
                    result: None,
                    error: None,
                }];
            }
        }
        Vec::new()
    }

    /// Terminal chunk when the run finished without an intervening pause. Returns
    /// `None` when `paused()` is already true (the pause chunk already terminated
    /// the stream from within `on_event`).
    pub fn finish_ok(&mut self, _state: &ReActState) -> Option<ConverseChunk> {
        if self.paused() {
            return None;
        }
        Some(ConverseChunk::RunCompleted {
            run_id: self.run_id.clone(),
        })
    }

    /// A `MessageCompleted` chunk for the run's final assistant reply, if the run
    /// streamed any message content and didn't pause.
    pub fn message_completed(&self) -> Option<ConverseChunk> {
        if self.paused() || !self.message_started {
            return None;
        }
        Some(ConverseChunk::MessageCompleted {
            message_id: self.message_id.clone(),
            content: self.message_text.clone(),
        })
    }

    pub fn finish_err(&mut self, err: &RunError) -> Option<ConverseChunk> {
        if self.paused() {
            return None;
        }
        Some(ConverseChunk::RunFailed {
            run_id: self.run_id.clone(),
            reason: RunFailureReason::ProviderError,
            message: err.to_string(),
        })
    }
}

/// Pure convenience wrapper for callers that only need a one-shot mapping (e.g. tests)
/// without the per-run state `ChunkMapper` tracks.
pub fn stream_event_to_chunks(run_id: &str, event: StreamEvent<ReActState>) -> Vec<ConverseChunk> {
    ChunkMapper::new(run_id.to_string()).on_event(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MessageChunk, StreamMetadata};

    #[test]
    fn message_delta_from_think_node() {
        let mut mapper = ChunkMapper::new("run-1".to_string());
        let chunks = mapper.on_event(StreamEvent::Messages {
            chunk: MessageChunk {
                content: "hi".to_string(),
            },
            metadata: StreamMetadata {
                graph_node: "think".to_string(),
            },
        });
        assert_eq!(chunks.len(), 1);
        assert!(matches!(&chunks[0], ConverseChunk::MessageDelta { delta, .. } if delta == "hi"));
    }

    #[test]
    fn non_think_message_chunk_is_ignored() {
        let mut mapper = ChunkMapper::new("run-1".to_string());
        let chunks = mapper.on_event(StreamEvent::Messages {
            chunk: MessageChunk {
                content: "hi".to_string(),
            },
            metadata: StreamMetadata {
                graph_node: "observe".to_string(),
            },
        });
        assert!(chunks.is_empty());
    }

    #[test]
    fn approval_required_custom_event_emits_run_paused_and_sets_paused() {
        let mut mapper = ChunkMapper::new("run-1".to_string());
        let chunks = mapper.on_event(StreamEvent::Custom(serde_json::json!({
            "type": APPROVAL_REQUIRED_EVENT_TYPE,
            "tool_call_id": "t1",
            "name": "delete_file",
            "arguments": {"path": "/tmp/x"},
        })));
        assert_eq!(chunks.len(), 1);
        assert!(matches!(&chunks[0], ConverseChunk::RunPaused { .. }));
        assert!(mapper.paused());
        assert!(mapper.finish_ok(&ReActState::default()).is_none());
    }

    #[test]
    fn finish_ok_emits_run_completed_when_not_paused() {
        let mut mapper = ChunkMapper::new("run-1".to_string());
        let chunk = mapper.finish_ok(&ReActState::default());
        assert!(matches!(chunk, Some(ConverseChunk::RunCompleted { .. })));
    }
}
