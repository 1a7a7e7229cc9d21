//! Conversation-related types.

use tiny_agent_model::Message;

/// Represents a conversation.
///
/// The conversation lives in memory only, and can only grow: messages are
/// appended by the agent and never changed or reordered afterwards.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    /// Returns all messages, oldest first.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
