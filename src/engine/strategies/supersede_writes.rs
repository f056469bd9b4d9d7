use crate::engine::{PassContext, index, placeholder, tokens};
use crate::state::{SessionState, StrategyKind};
use crate::transcript::{AssistantBlock, Message};
use serde_json::Value;
use std::collections::HashSet;

const WRITE_TOOLS: &[&str] = &["write", "edit"];

/// String arguments of a write/edit call that carry file bodies.
const BODY_FIELDS: &[&str] = &["content", "text", "oldText", "newText"];

/// Collapse the body arguments of writes and edits to files that were read
/// again afterwards.
///
/// Walks from newest to oldest, so every path in `read_paths` was read after
/// the call being looked at. This rewrites tool-call arguments on assistant
/// turns; tool results are left alone.
pub fn apply_supersede_writes(
    messages: &mut [Message],
    ctx: &mut PassContext<'_>,
    state: &mut SessionState,
) -> usize {
    let mut read_paths: HashSet<String> = HashSet::new();
    let mut pruned = 0;

    for message in messages.iter_mut().rev() {
        match message {
            Message::ToolResult(result) => {
                if result.tool_name != "read" || result.is_error {
                    continue;
                }
                if let Some(path) = ctx.index.get(&result.tool_call_id).and_then(index::path_arg) {
                    read_paths.insert(path.to_string());
                }
            }
            Message::Assistant(assistant) => {
                for block in assistant.content.iter_mut() {
                    let AssistantBlock::ToolCall { id, name, arguments, .. } = block else {
                        continue;
                    };
                    if !WRITE_TOOLS.contains(&name.as_str()) {
                        continue;
                    }
                    let Some(path) = index::target_path_arg(arguments).map(str::to_string) else {
                        continue;
                    };
                    if !read_paths.contains(&path) {
                        continue;
                    }
                    if ctx.is_protected(name, Some(&*arguments)) {
                        log::trace!("Keeping {} to protected path {}", name, path);
                        continue;
                    }

                    if let Some(tokens_saved) = collapse_body_fields(arguments) {
                        ctx.index.insert(id.clone(), arguments.clone());
                        state.record_prune(StrategyKind::SupersedeWrites, tokens_saved);
                        state.push_detail(
                            StrategyKind::SupersedeWrites,
                            name.clone(),
                            None,
                            tokens_saved,
                            format!("Path: {}", path),
                        );
                        pruned += 1;
                    }
                }
            }
            Message::User(_) | Message::Other(_) => {}
        }
    }

    pruned
}

/// Replace every body field still holding real content. Returns the tokens
/// saved, or `None` when nothing was replaced.
fn collapse_body_fields(arguments: &mut Value) -> Option<usize> {
    let mut tokens_saved = 0;
    let mut replaced = false;

    for field in BODY_FIELDS {
        if let Some(Value::String(body)) = arguments.get_mut(*field) {
            if body == placeholder::SUPERSEDED_CONTENT {
                continue;
            }
            tokens_saved += tokens::estimate_text_tokens(body);
            *body = placeholder::SUPERSEDED_CONTENT.to_string();
            replaced = true;
        }
    }

    replaced.then_some(tokens_saved)
}
