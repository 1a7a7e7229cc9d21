use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation. Tool results are also sent
    /// with this role.
    User,
    /// The model.
    Assistant,
}

/// One unit of a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// A request from the model to call a tool.
    ToolUse {
        /// The unique identifier for the tool call request.
        id: String,
        /// The name of the tool to call.
        name: String,
        /// The structured arguments to pass to the tool.
        input: Value,
    },
    /// The outcome of a tool call, answering a [`ContentBlock::ToolUse`].
    ToolResult {
        /// The identifier of the tool call request this result answers.
        tool_use_id: String,
        /// The textual result, or the error description if the call failed.
        content: String,
        /// Whether the call failed.
        #[serde(default)]
        is_error: bool,
    },
}

impl ContentBlock {
    /// Creates a text block.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a tool use block.
    #[inline]
    pub fn tool_use<S1: Into<String>, S2: Into<String>>(
        id: S1,
        name: S2,
        input: Value,
    ) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Creates a tool result block.
    #[inline]
    pub fn tool_result<S1: Into<String>, S2: Into<String>>(
        tool_use_id: S1,
        content: S2,
        is_error: bool,
    ) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error,
        }
    }
}

/// A complete message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message.
    pub role: Role,
    /// The blocks of the message, in order.
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Creates a user message holding a single text block.
    #[inline]
    pub fn user_text<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Creates a user message from a batch of tool results.
    #[inline]
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: results,
        }
    }

    /// Creates an assistant message with the given blocks.
    #[inline]
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Returns the tool use requests in this message, in order.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => {
                Some((id.as_str(), name.as_str(), input))
            }
            _ => None,
        })
    }

    /// Concatenates all text blocks of this message.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text: t } = block {
                text.push_str(t);
            }
        }
        text
    }
}
