use serde::{Deserialize, Serialize};

use crate::message::Message;

/// The reason why the model stopped generating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// The model reached a natural stopping point.
    EndTurn,
    /// The model needs to call one or more tools.
    ToolUse,
    /// The response hit the token limit.
    MaxTokens,
    /// A custom stop sequence was generated.
    StopSequence,
    /// Anything the provider reports that is not listed above.
    Other,
}

/// A complete response from the model provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelResponse {
    /// The message generated by the model, always with the assistant role.
    pub message: Message,
    /// Why the model stopped, if the provider reports it.
    pub stop_reason: Option<StopReason>,
}
