use super::summarize_args;
use crate::engine::{PassContext, placeholder, tokens};
use crate::state::{SessionState, StrategyKind};
use crate::transcript::{ContentBlock, Message};

/// Replace large successful outputs that have aged out of the protection
/// window with a note telling the model to re-run the tool.
pub fn apply_output_body_replace(
    messages: &mut [Message],
    ctx: &mut PassContext<'_>,
    state: &mut SessionState,
) -> usize {
    let min_chars = ctx.policy.strategies.output_body_replace.min_chars;
    let mut pruned = 0;

    for (i, message) in messages.iter_mut().enumerate() {
        let Some(result) = message.as_tool_result_mut() else {
            continue;
        };
        let turn_age = ctx.turn_age(i);
        if result.is_error || ctx.is_within_protection(turn_age) {
            continue;
        }
        let args = ctx.index.get(&result.tool_call_id);
        if ctx.is_protected(&result.tool_name, args) {
            continue;
        }
        if result.content.is_empty() || placeholder::is_placeholder(&result.content) {
            continue;
        }

        if output_size(&result.content, min_chars) < min_chars {
            continue;
        }

        let tokens_saved = tokens::estimate_block_tokens(&result.content);
        let summary = summarize_args(args);
        placeholder::replace_content(
            &mut result.content,
            placeholder::large_output(&result.tool_name, &summary, turn_age),
        );

        state.record_prune(StrategyKind::OutputBodyReplace, tokens_saved);
        state.push_detail(
            StrategyKind::OutputBodyReplace,
            result.tool_name.clone(),
            Some(turn_age),
            tokens_saved,
            summary,
        );
        pruned += 1;
    }

    pruned
}

/// Text length, with every image counted as over the threshold on its own.
fn output_size(content: &[ContentBlock], min_chars: usize) -> usize {
    content
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text, .. } => text.chars().count(),
            ContentBlock::Image { .. } => min_chars.saturating_add(1),
        })
        .fold(0, usize::saturating_add)
}
