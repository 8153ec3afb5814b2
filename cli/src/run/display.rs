//! Message and state display formatting for stderr output.
//!
//! Provides truncation and formatting utilities for [`Message`](converse_core::Message)
//! and [`ReActState`] when streaming to the CLI.

use converse_core::{Message, ReActState, ToolCall, ToolResult};

/// Indent for nested state fields (one level).
const INDENT: &str = "  ";

/// Truncates a string to at most `max` chars; appends "..." when truncated. UTF-8 safe.
pub(crate) fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    let suffix_len = 3;
    if max <= suffix_len {
        return s.chars().take(max).collect();
    }
    let content_max = max - suffix_len;
    if s.chars().count() <= max {
        return s.to_string();
    }
    format!(
        "{}{}",
        s.chars().take(content_max).collect::<String>(),
        SUFFIX
    )
}

/// Formats one Message with content truncated for display (User/Assistant/System).
pub(crate) fn format_message_truncated(m: &Message, max: usize) -> String {
    match m {
        Message::System(s) => format!("System({})", truncate_display(s, max)),
        Message::User(s) => format!("User({})", truncate_display(s, max)),
        Message::Assistant(s) => format!("Assistant({})", truncate_display(s, max)),
    }
}

/// Formats one ToolCall with arguments truncated for display.
fn format_tool_call_truncated(tc: &ToolCall, max: usize) -> String {
    format!(
        "ToolCall {{ name: {:?}, arguments: {:?}, id: {:?} }}",
        tc.name,
        truncate_display(&tc.arguments, max),
        tc.id
    )
}

/// Formats one ToolResult with content truncated for display.
fn format_tool_result_truncated(tr: &ToolResult, max: usize) -> String {
    format!(
        "ToolResult {{ call_id: {:?}, name: {:?}, content: {:?} }}",
        tr.call_id,
        tr.name,
        truncate_display(&tr.content, max)
    )
}

/// Formats ReActState for stderr: one field per line, one message/tool_call/tool_result per line.
pub(crate) fn format_react_state_display(state: &ReActState, max: usize) -> String {
    let mut lines = vec!["ReActState {".to_string()];

    lines.push(format!("{}messages:", INDENT));
    for m in &state.messages {
        lines.push(format!(
            "{}{}{}",
            INDENT,
            INDENT,
            format_message_truncated(m, max)
        ));
    }

    lines.push(format!("{}tool_calls:", INDENT));
    for tc in &state.tool_calls {
        lines.push(format!(
            "{}{}{}",
            INDENT,
            INDENT,
            format_tool_call_truncated(tc, max)
        ));
    }

    lines.push(format!("{}tool_results:", INDENT));
    for tr in &state.tool_results {
        lines.push(format!(
            "{}{}{}",
            INDENT,
            INDENT,
            format_tool_result_truncated(tr, max)
        ));
    }

    lines.push(format!("{}turn_count: {}", INDENT, state.turn_count));
    lines.push(format!(
        "{}approval_result: {:?}",
        INDENT, state.approval_result
    ));
    lines.push("}".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use converse_core::{ToolCall, ToolResult};

    #[test]
    fn truncate_display_handles_short_exact_and_truncated() {
        assert_eq!(truncate_display("abc", 10), "abc");
        assert_eq!(truncate_display("abcdef", 3), "abc");
        assert_eq!(truncate_display("abcdefghij", 5), "ab...");
    }

    #[test]
    fn format_message_truncated_for_all_variants() {
        assert_eq!(
            format_message_truncated(&Message::System("hello system".into()), 8),
            "System(hello...)"
        );
        assert_eq!(
            format_message_truncated(&Message::User("hello user".into()), 8),
            "User(hello...)"
        );
        assert_eq!(
            format_message_truncated(&Message::Assistant("hello assistant".into()), 8),
            "Assistant(hello...)"
        );
    }

    #[test]
    fn format_react_state_display_contains_sections() {
        let state = ReActState {
            messages: vec![
                Message::user("question"),
                Message::Assistant("answer".into()),
            ],
            tool_calls: vec![ToolCall {
                name: "web_fetch".to_string(),
                arguments: r#"{"url":"https://example.com/very/long/path"}"#.to_string(),
                id: Some("c1".to_string()),
            }],
            tool_results: vec![ToolResult {
                call_id: Some("c1".to_string()),
                name: Some("web_fetch".to_string()),
                content: "very long tool content output".to_string(),
                is_error: false,
            }],
            turn_count: 2,
            approval_result: Some(true),
            ..ReActState::default()
        };

        let rendered = format_react_state_display(&state, 12);
        assert!(rendered.contains("ReActState {"));
        assert!(rendered.contains("messages:"));
        assert!(rendered.contains("tool_calls:"));
        assert!(rendered.contains("tool_results:"));
        assert!(rendered.contains("turn_count: 2"));
        assert!(rendered.contains("approval_result: Some(true)"));
        assert!(rendered.contains("Assistant(answer)"));
        assert!(rendered.contains("..."));
    }
}
