//! Content signatures
//!
//! A signature identifies a tool invocation by what it asked for: the tool name
//! plus its arguments with keys sorted and null values dropped. Two calls with
//! the same signature are exact duplicates.

use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Signatures memoized by tool-call id.
///
/// Lives for one pass only. Message content may be rewritten between passes,
/// so a cache must never outlive the pass that built it.
#[derive(Debug, Default)]
pub struct SignatureCache {
    by_call_id: HashMap<String, String>,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature(&mut self, tool_name: &str, args: &Value, tool_call_id: &str) -> String {
        if let Some(hit) = self.by_call_id.get(tool_call_id) {
            return hit.clone();
        }
        let signature = compute_signature(tool_name, args);
        self.by_call_id
            .insert(tool_call_id.to_string(), signature.clone());
        signature
    }

    pub fn len(&self) -> usize {
        self.by_call_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_call_id.is_empty()
    }
}

/// BLAKE3 over the canonical `{name, args}` payload, hex encoded (64 chars).
pub fn compute_signature(tool_name: &str, args: &Value) -> String {
    let payload = json!({ "name": tool_name, "args": normalize(args) });
    blake3::hash(payload.to_string().as_bytes())
        .to_hex()
        .to_string()
}

/// Sort object keys recursively and drop null-valued keys.
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                let inner = &map[key.as_str()];
                if !inner.is_null() {
                    sorted.insert(key.clone(), normalize(inner));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}
