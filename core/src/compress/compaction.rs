//! Conversation compaction: prune old tool results and compact history via LLM summarization.
//!
//! Capabilities:
//! - **prune**: Replace old tool results beyond a token limit with a placeholder to control context length.
//! - **compact**: Summarize earlier messages into one System message via LLM and keep the most recent N as-is.

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;

use super::config::CompactionConfig;
use super::context_window::estimate_tokens;

/// Placeholder text used to replace pruned tool results in messages.
pub const PRUNE_PLACEHOLDER: &str = "[Old tool result cleared]";

/// Returns true if the message is a User message in tool-result form (`Tool xxx returned: ...`).
fn is_tool_result_message(m: &Message) -> bool {
    match m {
        Message::User(s) => s.starts_with("Tool ") && s.contains(" returned: "),
        _ => false,
    }
}

/// Replace old tool results beyond the keep-token limit with a placeholder.
///
/// Traverses messages from newest to oldest, accumulating tokens for tool-result messages only.
/// Results that push the total over `prune_keep_tokens` are marked for pruning. If the total
/// prunable tokens would be less than `prune_minimum`, no change is made.
pub fn prune(messages: Vec<Message>, config: &CompactionConfig) -> Vec<Message> {
    if !config.prune || config.prune_keep_tokens == 0 {
        return messages;
    }
    let min = config.prune_minimum.unwrap_or(20_000);

    let mut total: u32 = 0;
    let mut pruned: u32 = 0;
    let mut to_prune = Vec::new();

    for (i, m) in messages.iter().enumerate().rev() {
        if is_tool_result_message(m) {
            let tok = estimate_tokens(std::slice::from_ref(m));
            total += tok;
            if total > config.prune_keep_tokens {
                pruned += tok;
                to_prune.push(i);
            }
        }
    }

    if pruned < min {
        return messages;
    }

    let mut out = messages;
    for i in to_prune {
        if let Some(Message::User(_)) = out.get_mut(i) {
            out[i] = Message::User(PRUNE_PLACEHOLDER.to_string());
        }
    }
    out
}

/// Summarize earlier messages into one System message via LLM and keep the most recent N as-is.
///
/// Output is `[one summary System message] + [last compact_keep_recent original messages]`.
pub async fn compact(
    messages: &[Message],
    llm: &dyn LlmClient,
    config: &CompactionConfig,
) -> Result<Vec<Message>, AgentError> {
    let keep = config.compact_keep_recent;
    if messages.len() <= keep {
        return Ok(messages.to_vec());
    }
    let split = messages.len().saturating_sub(keep);
    let (to_summarize, recent) = messages.split_at(split);

    let prompt = build_summary_prompt(to_summarize);
    let summary_msgs = vec![Message::User(prompt)];
    let response = llm.invoke(&summary_msgs).await?;
    let content = response.content;

    let summary = Message::System(format!("[Summary of earlier conversation]: {}", content));
    let mut out = vec![summary];
    out.extend(recent.iter().cloned());
    Ok(out)
}

/// Build the prompt sent to the LLM: instructions on what to summarize, then the message list.
fn build_summary_prompt(msgs: &[Message]) -> String {
    let mut parts = vec![
        "Summarize the following conversation. Focus on:".to_string(),
        "- What was done".to_string(),
        "- What is being worked on".to_string(),
        "- Which files are involved".to_string(),
        "- What needs to be done next".to_string(),
        "".to_string(),
    ];
    for m in msgs {
        match m {
            Message::System(s) => parts.push(format!("System: {}", s)),
            Message::User(s) => parts.push(format!("User: {}", s)),
            Message::Assistant(s) => parts.push(format!("Assistant: {}", s)),
        }
    }
    parts.join("\n")
}
