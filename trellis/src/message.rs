//! Message and content-block types for the converse wire shape.
//!
//! A message is a role plus an ordered list of content blocks. Blocks are
//! text, a tool invocation requested by the assistant (`toolUse`), or the
//! response to one (`toolResult`). Backends serialize this logical shape to
//! their own provider format at the adapter boundary; the engine only ever
//! sees these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user input (also carries tool results back to the model).
    User,
    /// Model output.
    Assistant,
    /// System prompt.
    System,
}

/// A tool invocation requested by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUseBlock {
    /// Correlates this use with its eventual `toolResult`.
    pub tool_use_id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Structured input, shaped by the tool's input schema.
    pub input: Value,
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
}

/// One piece of a tool result: plain text or structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultContent {
    /// Plain text result.
    Text(String),
    /// Structured result.
    Json(Value),
}

/// The response to a prior `toolUse` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultBlock {
    /// Id of the originating `toolUse`.
    pub tool_use_id: String,
    pub status: ToolResultStatus,
    pub content: Vec<ToolResultContent>,
}

/// One content block within a message.
///
/// Serializes to the logical wire shape: `{"text": …}`,
/// `{"toolUse": {…}}`, or `{"toolResult": {…}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text(String),
    #[serde(rename = "toolUse")]
    ToolUse(ToolUseBlock),
    #[serde(rename = "toolResult")]
    ToolResult(ToolResultBlock),
}

/// A single message in the conversation: role plus ordered content blocks.
///
/// **Interaction**: appended to `ChatState::messages` by graph nodes,
/// passed to `ModelBackend::converse`, and scanned by the tool dispatcher
/// for `toolUse` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Creates a message with a single text block.
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// Creates a user message with one text block.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Creates an assistant message with one text block.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Creates a system message with one text block.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// All text blocks joined with newlines. Non-text blocks are skipped.
    pub fn text_blocks(&self) -> String {
        let blocks: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        blocks.join("\n")
    }

    /// All `toolUse` blocks, in order.
    pub fn tool_uses(&self) -> Vec<&ToolUseBlock> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(tool_use) => Some(tool_use),
                _ => None,
            })
            .collect()
    }
}

/// Builds a message from one or more text blocks (defaulting to one per item).
///
/// Mirrors the converse convention of a message holding several text blocks.
pub fn text(blocks: impl IntoIterator<Item = impl Into<String>>, role: Role) -> Message {
    Message {
        role,
        content: blocks
            .into_iter()
            .map(|block| ContentBlock::Text(block.into()))
            .collect(),
    }
}
