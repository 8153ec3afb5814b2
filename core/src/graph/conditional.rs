//! Conditional edges: state-based routing after a node completes.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// `(state) -> key`. The returned key is looked up in the router's `path_map`,
/// or used directly as the next node id / [`super::END`] when there is none.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// One node's conditional routing: a path function plus an optional key -> node-id map.
pub struct ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub path: ConditionalRouterFn<S>,
    pub path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Resolves the next node id for the given state: calls `path`, then looks
    /// the result up in `path_map` when present (falling back to the raw key
    /// if the map doesn't contain it).
    pub fn resolve(&self, state: &S) -> String {
        let key = (self.path)(state);
        match &self.path_map {
            Some(map) => map.get(&key).cloned().unwrap_or(key),
            None => key,
        }
    }
}

impl<S> Clone for ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            path_map: self.path_map.clone(),
        }
    }
}

/// An edge target resolved at compile time: either a fixed next node, or a
/// router to call with the post-node state.
pub enum NextEntry<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    Unconditional(String),
    Conditional(ConditionalRouter<S>),
}
