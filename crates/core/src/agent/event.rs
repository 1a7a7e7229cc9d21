use serde_json::Value;

use crate::tool::ToolResult;

/// Something that happened while the agent was running.
///
/// Events carry plain data only. Formatting them for a terminal or any other
/// surface is up to the receiver.
#[derive(Clone, Copy, Debug)]
pub enum AgentEvent<'a> {
    /// The agent is about to read the next user input.
    AwaitingInput,
    /// A request has been sent to the model.
    InferenceStarted,
    /// The model has answered, or the request has failed.
    InferenceFinished,
    /// The model said something.
    Transcript(&'a str),
    /// The model asked for a tool, which is about to run.
    ToolCall {
        /// The identifier of the request.
        id: &'a str,
        /// The requested tool.
        name: &'a str,
        /// The raw input from the model.
        input: &'a Value,
    },
    /// A tool call has finished.
    ToolResult {
        /// The identifier of the request.
        id: &'a str,
        /// The requested tool.
        name: &'a str,
        /// The outcome, which will be sent back to the model.
        result: &'a ToolResult,
    },
}
