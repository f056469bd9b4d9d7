use crate::engine::{PassContext, placeholder, tokens};
use crate::state::{SessionState, StrategyKind};
use crate::transcript::Message;

/// Text gathered from an error payload before picking its first line
const GATHER_CHARS: usize = 200;

/// Longest first line kept in the placeholder
const FIRST_LINE_CHARS: usize = 150;

/// Shrink old error results down to their first line.
pub fn apply_purge_errors(
    messages: &mut [Message],
    ctx: &mut PassContext<'_>,
    state: &mut SessionState,
) -> usize {
    let min_turn_age = ctx.policy.strategies.purge_errors.min_turn_age;
    let mut pruned = 0;

    for (i, message) in messages.iter_mut().enumerate() {
        let Some(result) = message.as_tool_result_mut() else {
            continue;
        };
        if !result.is_error {
            continue;
        }

        let turn_age = ctx.turn_age(i);
        if turn_age < min_turn_age {
            continue;
        }
        // Counted as soon as it is old enough, even inside the window.
        if ctx.is_protected(&result.tool_name, ctx.index.get(&result.tool_call_id)) {
            state.record_protected_skip();
            continue;
        }
        if ctx.is_within_protection(turn_age) || placeholder::is_placeholder(&result.content) {
            continue;
        }

        let mut gathered = String::new();
        for text in result.content.iter().filter_map(|b| b.as_text()) {
            gathered.push_str(text);
            if gathered.chars().count() > GATHER_CHARS {
                break;
            }
        }
        let head = tokens::truncate_chars(&gathered, GATHER_CHARS);
        let first_line = tokens::truncate_chars(head.lines().next().unwrap_or(""), FIRST_LINE_CHARS);

        let tokens_saved = tokens::estimate_block_tokens(&result.content);
        let replacement = placeholder::stale_error(first_line);
        let summary = first_line.to_string();
        placeholder::replace_content(&mut result.content, replacement);

        state.record_prune(StrategyKind::PurgeErrors, tokens_saved);
        state.push_detail(
            StrategyKind::PurgeErrors,
            result.tool_name.clone(),
            Some(turn_age),
            tokens_saved,
            summary,
        );
        pruned += 1;
    }

    pruned
}
