//! Extension trait: attach node-start/complete/error tracing to a `StateGraph`.

use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::{LoggingNodeMiddleware, StateGraph};
use crate::state::ReActState;

/// Adds `.with_node_logging()` to `StateGraph<ReActState>`.
///
/// Equivalent to `.with_middleware(Arc::new(LoggingNodeMiddleware::default()))`,
/// used by `ReactRunner::new` when built with `verbose = true`.
pub trait WithNodeLogging {
    fn with_node_logging(self) -> Self;
}

impl<S> WithNodeLogging for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn with_node_logging(self) -> Self {
        self.with_middleware(Arc::new(LoggingNodeMiddleware::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Next, Node, START, END};
    use crate::error::AgentError;
    use async_trait::async_trait;

    struct NoopNode;

    #[async_trait]
    impl Node<ReActState> for NoopNode {
        fn id(&self) -> &str {
            "noop"
        }

        async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
            Ok((state, Next::Continue))
        }
    }

    #[test]
    fn with_node_logging_compiles_without_error() {
        let mut graph = StateGraph::<ReActState>::new();
        graph
            .add_node("noop", Arc::new(NoopNode))
            .add_edge(START, "noop")
            .add_edge("noop", END);
        let graph = graph.with_node_logging();
        assert!(graph.compile().is_ok());
    }
}
