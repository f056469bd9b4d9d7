//! Placeholder text substituted for pruned content.
//!
//! Hosts and other tooling match on these strings, so their bytes must stay
//! stable. A tool result is "already pruned" when its content is a single text
//! block starting with [`PREFIX`].

use crate::transcript::ContentBlock;

pub const PREFIX: &str = "[DCP:";

pub const DUPLICATE: &str = "[DCP: Exact duplicate of a later tool call. Pruned to save tokens.]";

pub const STALE_ERROR_HEADER: &str = "[DCP: Stale error payload minimized.]";

pub const SUPERSEDED_CONTENT: &str = "[DCP: Content superseded by later read]";

pub fn stale_error(first_line: &str) -> String {
    format!("{}\n{}...", STALE_ERROR_HEADER, first_line)
}

pub fn large_output(tool_name: &str, args_summary: &str, turn_age: usize) -> String {
    format!(
        "[DCP: Large output from {}({}...) pruned due to age (Turn {}). If you need this data again, re-run the tool.]",
        tool_name, args_summary, turn_age
    )
}

pub fn is_placeholder(content: &[ContentBlock]) -> bool {
    matches!(content, [ContentBlock::Text { text, .. }] if text.starts_with(PREFIX))
}

/// Swap the whole content list for a single placeholder block.
pub fn replace_content(content: &mut Vec<ContentBlock>, placeholder: String) {
    *content = vec![ContentBlock::text(placeholder)];
}
