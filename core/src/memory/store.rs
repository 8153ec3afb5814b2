//! Long-term, cross-thread key-value store: the `Store` trait and its supporting types.
//!
//! Distinct from [`super::Checkpointer`] (which snapshots one thread's graph
//! state): a `Store` is namespaced, queryable, and meant to outlive any single
//! run — e.g. memory tools write facts here that later runs, possibly in a
//! different thread, can look up.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Hierarchical namespace path, e.g. `["user-123", "memories"]`.
pub type Namespace = Vec<String>;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored value plus its namespace, key, and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub namespace: Namespace,
    pub key: String,
    pub value: Value,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Item {
    pub fn with_timestamps(
        namespace: Namespace,
        key: String,
        value: Value,
        created_at: SystemTime,
        updated_at: SystemTime,
    ) -> Self {
        Self {
            namespace,
            key,
            value,
            created_at,
            updated_at,
        }
    }
}

/// An [`Item`] returned from [`Store::search`], with an optional relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    pub item: Item,
    /// Similarity score from vector search; `None` for stores without one
    /// (e.g. [`super::InMemoryStore`]'s plain substring match).
    pub score: Option<f32>,
}

impl SearchItem {
    pub fn from_item(item: Item) -> Self {
        Self { item, score: None }
    }
}

/// Flattened search hit: just what a caller typically wants (key, value, score).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSearchHit {
    pub key: String,
    pub value: Value,
    pub score: Option<f32>,
}

/// Comparison operator for [`SearchOptions::filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
}

/// Options for [`Store::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub filter: Option<HashMap<String, FilterOp>>,
    pub limit: usize,
    pub offset: usize,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self {
            query: None,
            filter: None,
            limit: 10,
            offset: 0,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Whether a [`MatchCondition`]'s path anchors at the start or end of a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceMatchType {
    Prefix,
    Suffix,
}

/// One namespace-matching rule for [`ListNamespacesOptions`]. `"*"` segments
/// match any single component.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCondition {
    pub path: Vec<String>,
    pub match_type: NamespaceMatchType,
}

/// Options for [`Store::list_namespaces`].
#[derive(Debug, Clone, Default)]
pub struct ListNamespacesOptions {
    pub match_conditions: Vec<MatchCondition>,
    pub max_depth: Option<usize>,
    pub offset: usize,
    pub limit: usize,
}

impl ListNamespacesOptions {
    pub fn new() -> Self {
        Self {
            match_conditions: Vec::new(),
            max_depth: None,
            offset: 0,
            limit: usize::MAX,
        }
    }

    pub fn with_prefix(mut self, path: Vec<String>) -> Self {
        self.match_conditions.push(MatchCondition {
            path,
            match_type: NamespaceMatchType::Prefix,
        });
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// One operation in a [`Store::batch`] call.
#[derive(Debug, Clone)]
pub enum StoreOp {
    Get {
        namespace: Namespace,
        key: String,
    },
    /// `value: None` deletes the key.
    Put {
        namespace: Namespace,
        key: String,
        value: Option<Value>,
    },
    Search {
        namespace_prefix: Namespace,
        options: SearchOptions,
    },
    ListNamespaces {
        options: ListNamespacesOptions,
    },
}

/// Result of one [`StoreOp`], in the same order as the request.
#[derive(Debug, Clone)]
pub enum StoreOpResult {
    Get(Option<Item>),
    Put,
    Search(Vec<SearchItem>),
    ListNamespaces(Vec<Namespace>),
}

/// Namespaced, queryable key-value store for cross-thread/long-term memory.
#[async_trait]
pub trait Store: Send + Sync {
    async fn put(&self, namespace: &Namespace, key: &str, value: &Value) -> Result<(), StoreError>;

    async fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, StoreError>;

    async fn get_item(&self, namespace: &Namespace, key: &str) -> Result<Option<Item>, StoreError>;

    async fn delete(&self, namespace: &Namespace, key: &str) -> Result<(), StoreError>;

    /// Lists keys directly under `namespace`.
    async fn list(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError>;

    async fn search(
        &self,
        namespace_prefix: &Namespace,
        options: SearchOptions,
    ) -> Result<Vec<SearchItem>, StoreError>;

    async fn list_namespaces(
        &self,
        options: ListNamespacesOptions,
    ) -> Result<Vec<Namespace>, StoreError>;

    /// Runs several operations; implementations may batch them into one
    /// round-trip to the backing store.
    async fn batch(&self, ops: Vec<StoreOp>) -> Result<Vec<StoreOpResult>, StoreError>;

    /// Convenience wrapper over [`Store::search`] returning flattened hits.
    async fn search_simple(
        &self,
        namespace: &Namespace,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoreSearchHit>, StoreError>;
}
