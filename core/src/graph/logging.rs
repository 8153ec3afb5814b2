//! Structured tracing helpers for graph execution.
//!
//! Thin wrappers over `tracing` events so [`CompiledStateGraph::invoke`] and
//! [`LoggingNodeMiddleware`] log in one consistent shape.

use std::fmt::Debug;

/// Logs the start of a graph run.
pub fn log_graph_start(thread_id: Option<&str>) {
    tracing::info!(thread_id = thread_id.unwrap_or(""), "graph run started");
}

/// Logs successful completion of a graph run.
pub fn log_graph_complete(thread_id: Option<&str>, steps: usize) {
    tracing::info!(
        thread_id = thread_id.unwrap_or(""),
        steps,
        "graph run completed"
    );
}

/// Logs a graph run failing.
pub fn log_graph_error(thread_id: Option<&str>, node_id: &str, error: &str) {
    tracing::error!(
        thread_id = thread_id.unwrap_or(""),
        node_id,
        error,
        "graph run failed"
    );
}

/// Logs a node starting execution.
pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id, "node started");
}

/// Logs a node finishing execution.
pub fn log_node_complete(node_id: &str) {
    tracing::debug!(node_id, "node completed");
}

/// Logs a node's state update, when state is small enough to be worth a debug line.
pub fn log_state_update<S: Debug>(node_id: &str, state: &S) {
    tracing::trace!(node_id, state = ?state, "state updated");
}
