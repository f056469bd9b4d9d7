//! Transcript model
//!
//! The message shapes an agent host hands to the pruner before every model call:
//! user prompts, assistant turns (text, thinking and tool-call blocks) and tool
//! results. Fields the pruner does not care about (timestamps, usage, provider
//! metadata) are carried through untouched in `extra`.

use crate::error::{Result, TranscriptError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A single transcript entry, tagged by `role`.
///
/// Roles the pruner does not model (bash executions, compaction summaries,
/// host-specific entries) load as `Other` and are written back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    User(UserMessage),
    Assistant(AssistantMessage),
    ToolResult(ToolResultMessage),
    Other(Value),
}

const KNOWN_ROLES: [&str; 3] = ["user", "assistant", "toolResult"];

#[derive(Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
enum KnownMessage {
    User(UserMessage),
    Assistant(AssistantMessage),
    ToolResult(ToolResultMessage),
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
enum KnownMessageRef<'a> {
    User(&'a UserMessage),
    Assistant(&'a AssistantMessage),
    ToolResult(&'a ToolResultMessage),
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Message::User(user) => KnownMessageRef::User(user).serialize(serializer),
            Message::Assistant(assistant) => KnownMessageRef::Assistant(assistant).serialize(serializer),
            Message::ToolResult(result) => KnownMessageRef::ToolResult(result).serialize(serializer),
            Message::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let known = value
            .get("role")
            .and_then(Value::as_str)
            .is_some_and(|role| KNOWN_ROLES.contains(&role));
        if !known {
            return Ok(Message::Other(value));
        }

        let message: KnownMessage =
            serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        Ok(match message {
            KnownMessage::User(user) => Message::User(user),
            KnownMessage::Assistant(assistant) => Message::Assistant(assistant),
            KnownMessage::ToolResult(result) => Message::ToolResult(result),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub content: UserContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// User content is either a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub content: Vec<AssistantBlock>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultMessage {
    pub tool_call_id: String,
    pub tool_name: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Blocks that can appear in an assistant turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantBlock {
    Text {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Thinking {
        thinking: String,
        #[serde(
            rename = "thinkingSignature",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        signature: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ToolCall {
        id: String,
        name: String,
        #[serde(default)]
        arguments: Value,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

/// Blocks carried by tool results and block-form user content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentBlock {
    Text {
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }

    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        ContentBlock::Image {
            data: data.into(),
            mime_type: mime_type.into(),
            extra: Map::new(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text, .. } => Some(text),
            ContentBlock::Image { .. } => None,
        }
    }
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Message::User(UserMessage {
            content: UserContent::Text(text.into()),
            extra: Map::new(),
        })
    }

    pub fn assistant(content: Vec<AssistantBlock>) -> Self {
        Message::Assistant(AssistantMessage {
            content,
            extra: Map::new(),
        })
    }

    /// Assistant turn holding a single tool call.
    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self::assistant(vec![AssistantBlock::ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
            extra: Map::new(),
        }])
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: Vec<ContentBlock>,
        is_error: bool,
    ) -> Self {
        Message::ToolResult(ToolResultMessage {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            content,
            is_error,
            extra: Map::new(),
        })
    }

    pub fn role(&self) -> &str {
        match self {
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
            Message::ToolResult(_) => "toolResult",
            Message::Other(value) => value.get("role").and_then(Value::as_str).unwrap_or("unknown"),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    pub fn as_tool_result(&self) -> Option<&ToolResultMessage> {
        match self {
            Message::ToolResult(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_tool_result_mut(&mut self) -> Option<&mut ToolResultMessage> {
        match self {
            Message::ToolResult(result) => Some(result),
            _ => None,
        }
    }
}

/// Read a transcript from disk.
///
/// `.jsonl` files hold one message per line; anything else is read as a JSON
/// array of messages or an object with a `messages` array.
pub fn load_transcript(path: &Path) -> Result<Vec<Message>> {
    if !path.exists() {
        return Err(TranscriptError::NotFound(path.to_path_buf()).into());
    }
    let raw = fs::read_to_string(path)?;

    if is_jsonl(path) {
        let mut messages = Vec::new();
        for (line_no, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let message = serde_json::from_str(line).map_err(|e| TranscriptError::Malformed {
                path: path.to_path_buf(),
                reason: format!("line {}: {}", line_no + 1, e),
            })?;
            messages.push(message);
        }
        return Ok(messages);
    }

    let value: Value = serde_json::from_str(&raw)?;
    let messages = match value {
        Value::Array(_) => value,
        Value::Object(mut obj) => obj.remove("messages").ok_or_else(|| TranscriptError::Malformed {
            path: path.to_path_buf(),
            reason: "expected an array or an object with a 'messages' field".to_string(),
        })?,
        _ => {
            return Err(TranscriptError::Malformed {
                path: path.to_path_buf(),
                reason: "expected an array of messages".to_string(),
            }
            .into());
        }
    };

    serde_json::from_value(messages).map_err(|e| {
        TranscriptError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Write a transcript in the same layout `load_transcript` reads.
pub fn save_transcript(path: &Path, messages: &[Message]) -> Result<()> {
    let content = if is_jsonl(path) {
        to_jsonl(messages)?
    } else {
        serde_json::to_string_pretty(messages)?
    };
    fs::write(path, content)?;
    Ok(())
}

/// One message per line, each line terminated by `\n`.
pub fn to_jsonl(messages: &[Message]) -> Result<String> {
    let mut out = String::new();
    for message in messages {
        out.push_str(&serde_json::to_string(message)?);
        out.push('\n');
    }
    Ok(out)
}

fn is_jsonl(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jsonl")
}
