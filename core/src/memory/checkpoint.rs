//! Checkpoint data model: a snapshot of graph state at one step.

use std::collections::HashMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Current on-disk checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Pending-write channel markers (mirrors LangGraph's sentinel constants).
pub const ERROR: &str = "__error__";
pub const INTERRUPT: &str = "__interrupt__";
pub const RESUME: &str = "__resume__";
pub const SCHEDULED: &str = "__scheduled__";

/// Per-channel version counters, used to decide which channels changed since
/// the last checkpoint.
pub type ChannelVersions = HashMap<String, u64>;

/// Which channels a node wrote to (`task_id` -> channel name) plus the value,
/// kept for replay before they're folded into the next checkpoint.
pub type PendingWrite = (String, String, serde_json::Value);

/// Builds a `task_id -> write index` map, preserving first-seen order.
///
/// Used when replaying pending writes so the same task's writes apply in the
/// order they were produced.
pub fn writes_idx_map(writes: &[PendingWrite]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, (task_id, _, _)) in writes.iter().enumerate() {
        map.entry(task_id.clone()).or_insert(idx);
    }
    map
}

/// Why a checkpoint was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointSource {
    /// The initial state supplied to `invoke`/`stream`.
    Input,
    /// Written after a step of the main graph loop.
    Loop,
    /// Written after an external state update (e.g. resuming with new input).
    Update,
    /// Written when branching from an earlier checkpoint.
    Fork,
}

/// Metadata recorded alongside a checkpoint's channel values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Step index within the run; -1 for the input checkpoint.
    pub step: i64,
    pub created_at: Option<SystemTime>,
    /// Parent checkpoint id per namespace, for branched histories.
    pub parents: HashMap<String, String>,
}

/// A full snapshot of one state type `S` at a point in the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    pub v: u32,
    pub id: String,
    /// RFC3339 timestamp string.
    pub ts: String,
    pub channel_values: S,
    pub channel_versions: ChannelVersions,
    pub versions_seen: HashMap<String, ChannelVersions>,
    /// Channels written by the step that produced this checkpoint, if known.
    pub updated_channels: Option<Vec<String>>,
    pub pending_sends: Vec<PendingWrite>,
    pub metadata: CheckpointMetadata,
}

/// Checkpoint plus metadata, as returned by [`super::Checkpointer::get_tuple`].
pub type CheckpointTuple<S> = (Checkpoint<S>, CheckpointMetadata);

/// Lightweight entry for [`super::Checkpointer::list`] (no channel values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub metadata: CheckpointMetadata,
}
