use serde::{Deserialize, Serialize};
use tiny_agent_model::ContentBlock;

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Blocks of the assistant message in this response.
    pub content: Vec<ContentBlock>,
    /// If set, the request fails instead of producing the message.
    #[serde(default)]
    pub fails: bool,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified blocks.
    #[inline]
    pub fn with_content(content: impl Into<Vec<ContentBlock>>) -> Self {
        Self {
            content: content.into(),
            fails: false,
        }
    }

    /// Creates a `PresetResponse` with a single text block.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self::with_content([ContentBlock::text(text)])
    }

    /// Makes the request for this step fail.
    #[inline]
    pub fn with_failure(mut self) -> Self {
        self.fails = true;
        self
    }

    /// Returns whether this response asks for any tool.
    #[inline]
    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|block| matches!(block, ContentBlock::ToolUse { .. }))
    }
}
