//! The four pruning strategies.
//!
//! Each one is a pass over the whole transcript that rewrites content in place
//! and records what it did in the session state. Strategies skip content an
//! earlier strategy already replaced with a placeholder.

mod deduplicate;
mod output_replace;
mod purge_errors;
mod supersede_writes;

pub use deduplicate::apply_deduplicate;
pub use output_replace::apply_output_body_replace;
pub use purge_errors::apply_purge_errors;
pub use supersede_writes::apply_supersede_writes;

use super::PassContext;
use super::tokens::truncate_chars;
use crate::state::{SessionState, StrategyKind};
use crate::transcript::Message;
use serde_json::Value;

/// Longest argument rendering kept in placeholders and detail records.
pub const ARGS_SUMMARY_CHARS: usize = 100;

/// Run one strategy, returning the number of items it pruned.
pub fn apply(
    kind: StrategyKind,
    messages: &mut [Message],
    ctx: &mut PassContext<'_>,
    state: &mut SessionState,
) -> usize {
    match kind {
        StrategyKind::Deduplicate => apply_deduplicate(messages, ctx, state),
        StrategyKind::PurgeErrors => apply_purge_errors(messages, ctx, state),
        StrategyKind::SupersedeWrites => apply_supersede_writes(messages, ctx, state),
        StrategyKind::OutputBodyReplace => apply_output_body_replace(messages, ctx, state),
    }
}

/// Compact JSON of the arguments, cut to [`ARGS_SUMMARY_CHARS`].
pub fn summarize_args(args: Option<&Value>) -> String {
    match args {
        Some(args) => truncate_chars(&args.to_string(), ARGS_SUMMARY_CHARS).to_string(),
        None => "unknown args".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize_args() {
        assert_eq!(summarize_args(Some(&json!({ "path": "a.txt" }))), r#"{"path":"a.txt"}"#);
        assert_eq!(summarize_args(None), "unknown args");

        let long = json!({ "content": "x".repeat(500) });
        assert_eq!(summarize_args(Some(&long)).chars().count(), ARGS_SUMMARY_CHARS);
    }
}
