//! Executable graph produced by `StateGraph::compile*`: run with `invoke`, or `stream`.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::channels::BoxedStateUpdater;
use crate::error::AgentError;
use crate::memory::{
    Checkpoint, CheckpointMetadata, CheckpointSource, Checkpointer, RunnableConfig, Store,
};
use crate::stream::{CheckpointEvent, StreamEvent, StreamMode};

use super::conditional::NextEntry;
use super::interrupt::InterruptHandler;
use super::logging::{log_graph_complete, log_graph_error, log_graph_start};
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::retry::RetryPolicy;
use super::run_context::RunContext;
use super::state_graph::END;
use super::Next;

/// An executable graph: nodes, resolved edges, and the optional checkpointer,
/// store, middleware, state updater, retry policy and interrupt handler
/// attached at compile time.
///
/// Built by [`super::StateGraph::compile`] and friends. Not constructed directly.
pub struct CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) edge_order: Vec<String>,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) store: Option<Arc<dyn Store>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) state_updater: BoxedStateUpdater<S>,
    pub(super) retry_policy: RetryPolicy,
    pub(super) interrupt_handler: Option<Arc<dyn InterruptHandler>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs the graph to completion and returns the final state.
    pub async fn invoke(
        &self,
        state: S,
        config: Option<RunnableConfig>,
    ) -> Result<S, AgentError> {
        let run_config = config.unwrap_or_default();
        self.run_internal(state, run_config, None).await
    }

    /// Runs the graph, emitting `StreamEvent`s for the requested `modes` as it goes.
    ///
    /// The returned stream ends once the run completes (or fails; the error is
    /// logged, not delivered as an event — callers wanting the error should use
    /// [`Self::invoke`], or inspect the final `Values` event's absence).
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        modes: HashSet<StreamMode>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(64);
        let run_config = config.unwrap_or_default();

        let nodes = self.nodes.clone();
        let first_node_id = self.first_node_id.clone();
        let edge_order = self.edge_order.clone();
        let next_map = clone_next_map(&self.next_map);
        let checkpointer = self.checkpointer.clone();
        let store = self.store.clone();
        let middleware = self.middleware.clone();
        let state_updater = self.state_updater.clone();
        let retry_policy = self.retry_policy;
        let interrupt_handler = self.interrupt_handler.clone();

        tokio::spawn(async move {
            let graph = CompiledStateGraph {
                nodes,
                first_node_id,
                edge_order,
                next_map,
                checkpointer,
                store,
                middleware,
                state_updater,
                retry_policy,
                interrupt_handler,
            };
            let _ = graph.run_internal(state, run_config, Some((modes, tx))).await;
        });

        ReceiverStream::new(rx)
    }

    async fn run_internal(
        &self,
        mut state: S,
        run_config: RunnableConfig,
        stream: Option<(HashSet<StreamMode>, mpsc::Sender<StreamEvent<S>>)>,
    ) -> Result<S, AgentError> {
        log_graph_start(run_config.thread_id.as_deref());

        let ctx = match &stream {
            Some((modes, tx)) => {
                RunContext::new(run_config.clone()).with_streaming(modes.clone(), tx.clone())
            }
            None => RunContext::new(run_config.clone()),
        };

        let mut current = run_config
            .resume_from_node_id
            .clone()
            .unwrap_or_else(|| self.first_node_id.clone());
        let mut steps: i64 = 0;

        loop {
            if current == END {
                break;
            }
            let node = self.nodes.get(&current).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("unknown node id: {current}"))
            })?;

            if let Some((modes, tx)) = &stream {
                if modes.contains(&StreamMode::Tasks) {
                    let _ = tx
                        .send(StreamEvent::TaskStart {
                            node_id: current.clone(),
                        })
                        .await;
                }
            }

            let run_result = self.run_node_with_retry(node.as_ref(), state.clone(), &ctx).await;

            if let Some((modes, tx)) = &stream {
                if modes.contains(&StreamMode::Tasks) {
                    let result = run_result.as_ref().map(|_| ()).map_err(|e| e.to_string());
                    let _ = tx
                        .send(StreamEvent::TaskEnd {
                            node_id: current.clone(),
                            result,
                        })
                        .await;
                }
            }

            let (update, next) = match run_result {
                Ok(pair) => pair,
                Err(e) => {
                    log_graph_error(run_config.thread_id.as_deref(), &current, &e.to_string());
                    return Err(e);
                }
            };

            self.state_updater.apply_update(&mut state, &update);
            steps += 1;

            if let Some((modes, tx)) = &stream {
                if modes.contains(&StreamMode::Updates) {
                    let _ = tx
                        .send(StreamEvent::Updates {
                            node_id: current.clone(),
                            state: state.clone(),
                        })
                        .await;
                }
                if modes.contains(&StreamMode::Values) {
                    let _ = tx.send(StreamEvent::Values(state.clone())).await;
                }
            }

            if let Some(checkpointer) = &self.checkpointer {
                if run_config.thread_id.is_some() {
                    self.save_checkpoint(checkpointer.as_ref(), &run_config, &state, steps, &stream)
                        .await?;
                }
            }

            current = self.resolve_next(&current, next, &state)?;
        }

        log_graph_complete(run_config.thread_id.as_deref(), steps as usize);
        Ok(state)
    }

    async fn run_node_with_retry(
        &self,
        node: &dyn Node<S>,
        state: S,
        ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        let max_attempts = self.retry_policy.max_attempts();
        let mut attempt = 1;
        loop {
            let result = self.run_node_once(node, state.clone(), ctx).await;
            match result {
                Ok(ok) => return Ok(ok),
                Err(_) if attempt < max_attempts => {
                    let delay = self.retry_policy.delay_for_attempt(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn run_node_once(
        &self,
        node: &dyn Node<S>,
        state: S,
        ctx: &RunContext<S>,
    ) -> Result<(S, Next), AgentError> {
        match &self.middleware {
            Some(middleware) => {
                let ctx = ctx.clone();
                middleware
                    .around_run(
                        node.id(),
                        state,
                        Box::new(move |s| Box::pin(async move { node.run_with_context(s, &ctx).await })),
                    )
                    .await
            }
            None => node.run_with_context(state, ctx).await,
        }
    }

    fn resolve_next(&self, current: &str, next: Next, state: &S) -> Result<String, AgentError> {
        match next {
            Next::End => Ok(END.to_string()),
            Next::Node(id) => Ok(id),
            Next::Continue => match self.next_map.get(current) {
                Some(NextEntry::Unconditional(to)) => Ok(to.clone()),
                Some(NextEntry::Conditional(router)) => Ok(router.resolve(state)),
                None => Ok(END.to_string()),
            },
        }
    }

    async fn save_checkpoint(
        &self,
        checkpointer: &dyn Checkpointer<S>,
        run_config: &RunnableConfig,
        state: &S,
        step: i64,
        stream: &Option<(HashSet<StreamMode>, mpsc::Sender<StreamEvent<S>>)>,
    ) -> Result<(), AgentError> {
        let id = crate::memory::uuid6();
        let checkpoint = Checkpoint {
            v: crate::memory::CHECKPOINT_VERSION,
            id: id.clone(),
            ts: rfc3339_now(),
            channel_values: state.clone(),
            channel_versions: HashMap::new(),
            versions_seen: HashMap::new(),
            updated_channels: None,
            pending_sends: Vec::new(),
            metadata: CheckpointMetadata {
                source: CheckpointSource::Loop,
                step,
                created_at: Some(std::time::SystemTime::now()),
                parents: HashMap::new(),
            },
        };
        checkpointer
            .put(run_config, &checkpoint)
            .await
            .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;

        if let Some((modes, tx)) = stream {
            if modes.contains(&StreamMode::Checkpoints) {
                let _ = tx
                    .send(StreamEvent::Checkpoint(CheckpointEvent {
                        checkpoint_id: id,
                        timestamp: checkpoint.ts.clone(),
                        step,
                        state: state.clone(),
                        thread_id: run_config.thread_id.clone(),
                        checkpoint_ns: Some(run_config.checkpoint_ns.clone()),
                    }))
                    .await;
            }
        }
        Ok(())
    }
}

fn clone_next_map<S>(map: &HashMap<String, NextEntry<S>>) -> HashMap<String, NextEntry<S>>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    map.iter()
        .map(|(k, v)| {
            let cloned = match v {
                NextEntry::Unconditional(to) => NextEntry::Unconditional(to.clone()),
                NextEntry::Conditional(router) => NextEntry::Conditional(router.clone()),
            };
            (k.clone(), cloned)
        })
        .collect()
}

fn rfc3339_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
