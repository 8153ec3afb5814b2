//! Per-call run context passed to `Node::run_with_context`.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::memory::RunnableConfig;
use crate::stream::{StreamEvent, StreamMode};

/// Context threaded through one node invocation: run config and streaming.
///
/// Distinct from [`super::Runtime`], which bundles context for the whole run
/// (including a static `context: C` and `previous` state); `RunContext` is the
/// lighter, per-call value `CompiledStateGraph::invoke`/`stream` passes to
/// [`super::Node::run_with_context`].
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Run config (thread_id, checkpoint_ns, user_id, ...).
    pub config: RunnableConfig,
    /// Stream modes enabled for this run; empty when streaming is not active.
    pub stream_mode: HashSet<StreamMode>,
    /// Sender for stream events; `None` when streaming is not active.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Context with no streaming: empty `stream_mode`, no `stream_tx`.
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            stream_mode: HashSet::new(),
            stream_tx: None,
        }
    }

    pub fn with_streaming(
        mut self,
        stream_mode: HashSet<StreamMode>,
        stream_tx: mpsc::Sender<StreamEvent<S>>,
    ) -> Self {
        self.stream_mode = stream_mode;
        self.stream_tx = Some(stream_tx);
        self
    }
}

impl<S> Clone for RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            stream_mode: self.stream_mode.clone(),
            stream_tx: self.stream_tx.clone(),
        }
    }
}
