//! Summariser strategy: the capability `CompactNode` invokes to shrink conversation
//! history once it overflows. Modelled as a sum type rather than a trait object since
//! there are exactly two shapes and neither takes runtime-supplied behavior.

use crate::message::Message;

/// Which summarisation capability `CompactNode` uses when context overflows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SummariserStrategy {
    /// Summarize older messages into one system message via the run's LLM
    /// (see [`super::compaction::compact`]). The default, matching prior behavior.
    #[default]
    Llm,
    /// Deterministic: keep only the last `keep_count` messages, drop the rest.
    /// Never calls the LLM.
    SlidingWindow { keep_count: usize },
    /// Compaction disabled regardless of `CompactionConfig::auto`.
    None,
}

/// Keeps the last `keep_count` messages, dropping everything older. Pure and
/// deterministic: same input always produces the same output, no synthesis.
pub fn keep_last(keep_count: usize, messages: &[Message]) -> Vec<Message> {
    if messages.len() <= keep_count {
        return messages.to_vec();
    }
    messages[messages.len() - keep_count..].to_vec()
}
