//! Node middleware that logs node start/complete/error via [`super::logging`].

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::AgentError;

use super::logging::{log_node_complete, log_node_start, log_state_update};
use super::node_middleware::NodeMiddleware;
use super::Next;

/// Wraps every node's `run`/`run_with_context` with start/complete/error tracing.
///
/// Attach via [`super::StateGraph::with_middleware`] or `compile_with_middleware`.
pub struct LoggingNodeMiddleware<S> {
    _marker: PhantomData<fn() -> S>,
}

impl<S> Default for LoggingNodeMiddleware<S> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: Box<
            dyn FnOnce(
                    S,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = Result<(S, Next), AgentError>> + Send>,
                > + Send,
        >,
    ) -> Result<(S, Next), AgentError> {
        log_node_start(node_id);
        let result = inner(state).await;
        match &result {
            Ok((state, _)) => {
                log_state_update(node_id, state);
                log_node_complete(node_id);
            }
            Err(e) => {
                tracing::error!(node_id, error = %e, "node failed");
            }
        }
        result
    }
}
