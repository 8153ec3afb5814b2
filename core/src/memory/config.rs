//! Run-scoped configuration threaded through checkpointer calls and graph execution.

use serde::{Deserialize, Serialize};

/// Identifies a conversation/run for checkpointing and store namespacing.
///
/// `thread_id` is required by any [`super::Checkpointer`] call; `checkpoint_ns`
/// defaults to the empty string (the root namespace, as opposed to a subgraph's).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnableConfig {
    pub thread_id: Option<String>,
    pub checkpoint_id: Option<String>,
    #[serde(default)]
    pub checkpoint_ns: String,
    pub user_id: Option<String>,
    /// Node id to resume execution from, bypassing the graph's normal entry
    /// point. Set when resuming a paused run (e.g. after human approval).
    pub resume_from_node_id: Option<String>,
}
