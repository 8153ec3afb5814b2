//! In-memory checkpointer (MemorySaver). Dev and tests; not persistent.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::memory::checkpoint::{Checkpoint, CheckpointListItem, CheckpointMetadata};
use crate::memory::checkpointer::{CheckpointError, Checkpointer};
use crate::memory::config::RunnableConfig;

type ThreadKey = (String, String);

/// In-memory checkpointer. Key: (thread_id, checkpoint_ns) -> ordered checkpoints.
///
/// Not persistent across process restarts; use [`super::SqliteSaver`] for that.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer<S>>` in `StateGraph::compile_with_checkpointer`.
pub struct MemorySaver<S> {
    checkpoints: Mutex<HashMap<ThreadKey, Vec<(Checkpoint<S>, CheckpointMetadata)>>>,
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self {
            checkpoints: Mutex::new(HashMap::new()),
        }
    }
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self::default()
    }

    fn thread_id_required(config: &RunnableConfig) -> Result<String, CheckpointError> {
        config
            .thread_id
            .as_deref()
            .ok_or(CheckpointError::ThreadIdRequired)
            .map(String::from)
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let key = (thread_id, config.checkpoint_ns.clone());
        let mut checkpoints = self.checkpoints.lock().unwrap();
        let entries = checkpoints.entry(key).or_default();
        entries.retain(|(cp, _)| cp.id != checkpoint.id);
        entries.push((checkpoint.clone(), checkpoint.metadata.clone()));
        Ok(checkpoint.id.clone())
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let key = (thread_id, config.checkpoint_ns.clone());
        let checkpoints = self.checkpoints.lock().unwrap();
        let entries = match checkpoints.get(&key) {
            Some(entries) => entries,
            None => return Ok(None),
        };
        let found = if let Some(want_id) = &config.checkpoint_id {
            entries.iter().find(|(cp, _)| &cp.id == want_id)
        } else {
            entries.last()
        };
        Ok(found.cloned())
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread_id = Self::thread_id_required(config)?;
        let key = (thread_id, config.checkpoint_ns.clone());
        let checkpoints = self.checkpoints.lock().unwrap();
        let mut list: Vec<CheckpointListItem> = checkpoints
            .get(&key)
            .into_iter()
            .flatten()
            .map(|(cp, meta)| CheckpointListItem {
                checkpoint_id: cp.id.clone(),
                metadata: meta.clone(),
            })
            .collect();

        if let Some(a) = after {
            if let Some(pos) = list.iter().position(|i| i.checkpoint_id == a) {
                list = list[pos + 1..].to_vec();
            }
        }
        if let Some(b) = before {
            if let Some(pos) = list.iter().position(|i| i.checkpoint_id == b) {
                list = list[..pos].to_vec();
            }
        }
        if let Some(n) = limit {
            let len = list.len();
            if len > n {
                list = list[len - n..].to_vec();
            }
        }
        Ok(list)
    }
}
