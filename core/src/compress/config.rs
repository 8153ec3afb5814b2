//! Compaction configuration for context window management.
//!
//! Controls when and how to prune tool results and compact conversation history.

use super::summariser::SummariserStrategy;

/// Configuration for context compression: pruning and compaction.
#[derive(Debug, Clone)]
pub struct CompactionConfig {
    /// Which summariser `CompactNode` invokes once context overflows.
    pub strategy: SummariserStrategy,
    /// Whether to auto-compact when context overflows (hybrid token estimate).
    pub auto: bool,
    /// Whether to prune old tool results beyond `prune_keep_tokens`.
    pub prune: bool,
    /// Maximum context size in tokens (overflow triggers compaction when auto is true).
    pub max_context_tokens: u32,
    /// Tokens to reserve for generation; overflow = current + reserve > max_context_tokens.
    pub reserve_tokens: u32,
    /// When pruning, keep at most this many tokens of tool results (from most recent).
    pub prune_keep_tokens: u32,
    /// Minimum tokens to prune in one pass; below this, no pruning is applied.
    pub prune_minimum: Option<u32>,
    /// When compacting, keep this many most recent messages; older ones are summarized.
    pub compact_keep_recent: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            strategy: SummariserStrategy::default(),
            auto: false,
            prune: false,
            max_context_tokens: 128_000,
            reserve_tokens: 4096,
            prune_keep_tokens: 40_000,
            prune_minimum: Some(20_000),
            compact_keep_recent: 20,
        }
    }
}

impl CompactionConfig {
    /// Derives `max_context_tokens`/`reserve_tokens` from a resolved
    /// [`model_catalog::ModelSpec`], keeping the other fields at their default.
    ///
    /// Callers resolve `spec` once at startup (e.g. via a
    /// [`model_catalog::CompositeResolver`]) and reuse it across runs for the same model.
    pub fn from_model_spec(spec: &model_catalog::ModelSpec) -> Self {
        Self {
            max_context_tokens: spec.context_limit,
            reserve_tokens: spec.output_limit,
            ..Self::default()
        }
    }
}
