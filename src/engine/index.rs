use crate::transcript::{AssistantBlock, Message};
use serde_json::Value;
use std::collections::HashMap;

/// Tool-call id → the arguments the assistant sent with it.
///
/// Built once per pass. A strategy that rewrites a call's arguments writes the
/// new ones back, so later strategies see the transcript as it now stands.
/// Results whose id is missing here have unknown arguments and are left alone
/// by every strategy that needs them.
#[derive(Debug, Clone, Default)]
pub struct ToolCallIndex {
    arguments: HashMap<String, Value>,
}

impl ToolCallIndex {
    pub fn build(messages: &[Message]) -> Self {
        let mut arguments = HashMap::new();
        for message in messages {
            let Message::Assistant(assistant) = message else {
                continue;
            };
            for block in &assistant.content {
                if let AssistantBlock::ToolCall { id, arguments: args, .. } = block {
                    arguments.insert(id.clone(), args.clone());
                }
            }
        }
        Self { arguments }
    }

    /// Replace the recorded arguments of a call.
    pub fn insert(&mut self, tool_call_id: impl Into<String>, arguments: Value) {
        self.arguments.insert(tool_call_id.into(), arguments);
    }

    /// Arguments for a call, `None` when unknown or null.
    pub fn get(&self, tool_call_id: &str) -> Option<&Value> {
        self.arguments.get(tool_call_id).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

/// The `path` argument of a call, if it is a non-empty string.
pub fn path_arg(args: &Value) -> Option<&str> {
    string_arg(args, "path")
}

/// The file a write/edit targets: `path`, falling back to `file`.
pub fn target_path_arg(args: &Value) -> Option<&str> {
    string_arg(args, "path").or_else(|| string_arg(args, "file"))
}

fn string_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
