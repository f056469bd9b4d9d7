use super::summarize_args;
use crate::engine::{PassContext, placeholder, tokens};
use crate::state::{SessionState, StrategyKind};
use crate::transcript::Message;
use std::collections::HashSet;

/// Collapse older exact duplicates of a tool call, keeping the newest result.
///
/// Walks from newest to oldest. Protected and recent results are never
/// touched, but their signatures still count as seen so older unprotected
/// copies of them get pruned.
pub fn apply_deduplicate(
    messages: &mut [Message],
    ctx: &mut PassContext<'_>,
    state: &mut SessionState,
) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut pruned = 0;

    for i in (0..messages.len()).rev() {
        let turn_age = ctx.turn_age(i);
        let Some(result) = messages[i].as_tool_result_mut() else {
            continue;
        };
        let Some(args) = ctx.index.get(&result.tool_call_id) else {
            continue;
        };
        if placeholder::is_placeholder(&result.content) {
            continue;
        }

        let is_protected = ctx.is_protected(&result.tool_name, Some(args));
        let is_recent = ctx.is_within_protection(turn_age);
        let signature = ctx
            .signatures
            .signature(&result.tool_name, args, &result.tool_call_id);

        if is_protected || is_recent {
            if is_protected {
                state.record_protected_skip();
            }
            seen.insert(signature);
            continue;
        }

        if !seen.insert(signature) {
            let tokens_saved = tokens::estimate_block_tokens(&result.content);
            placeholder::replace_content(&mut result.content, placeholder::DUPLICATE.to_string());

            state.record_prune(StrategyKind::Deduplicate, tokens_saved);
            state.push_detail(
                StrategyKind::Deduplicate,
                result.tool_name.clone(),
                Some(turn_age),
                tokens_saved,
                summarize_args(Some(args)),
            );
            pruned += 1;
        }
    }

    pruned
}
