mod builder;
mod error;
mod event;
mod input;

use tiny_agent_model::{ContentBlock, Message, ModelRequest, ModelTool};

use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::Registry as ToolRegistry;
pub use builder::AgentBuilder;
pub use error::{AgentError, BuildError};
pub use event::AgentEvent;
pub use input::UserInput;

type EventHandler = Box<dyn Fn(&AgentEvent<'_>) + Send + Sync>;

/// An agent instance, which owns the conversation, the model client and the
/// tools.
///
/// The agent alternates between two phases. While awaiting user input, it
/// reads one line and appends it as a user message. While awaiting the
/// model, it sends the whole conversation, appends the reply, and runs every
/// requested tool in order. If the reply requested any tool, the results are
/// sent back as one user message and the model is asked again right away;
/// otherwise the agent goes back to the user.
pub struct Agent {
    model_client: ModelClient,
    tool_registry: ToolRegistry,
    tool_definitions: Vec<ModelTool>,
    system_prompt: Option<String>,
    conversation: Conversation,
    on_event: Option<EventHandler>,
}

impl Agent {
    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Runs the conversation until `input` is exhausted.
    ///
    /// Reaching the end of input is a normal termination. Failed tool calls
    /// are handed back to the model, only a failed inference request ends
    /// the run with an error.
    pub async fn run<I: UserInput>(
        &mut self,
        input: &mut I,
    ) -> Result<(), AgentError> {
        let mut read_user_input = true;
        loop {
            if read_user_input {
                let Some(line) = self.read_user_input(input).await else {
                    debug!("end of user input");
                    return Ok(());
                };
                self.conversation.push(Message::user_text(line));
            }

            let message = self.run_inference().await?;
            self.conversation.push(message.clone());

            let tool_results = self.handle_model_message(&message).await;
            if tool_results.is_empty() {
                read_user_input = true;
                continue;
            }
            read_user_input = false;
            self.conversation.push(Message::tool_results(tool_results));
        }
    }

    async fn read_user_input<I: UserInput>(
        &self,
        input: &mut I,
    ) -> Option<String> {
        loop {
            self.emit(AgentEvent::AwaitingInput);
            let line = input.read_line().await?;
            // The API rejects empty text blocks.
            if !line.trim().is_empty() {
                return Some(line);
            }
        }
    }

    async fn run_inference(&self) -> Result<Message, AgentError> {
        let request = ModelRequest {
            system: self.system_prompt.clone(),
            messages: self.conversation.messages().to_vec(),
            tools: self.tool_definitions.clone(),
        };

        self.emit(AgentEvent::InferenceStarted);
        let resp_or_err = self.model_client.send_request(request).await;
        self.emit(AgentEvent::InferenceFinished);

        match resp_or_err {
            Ok(resp) => {
                debug!("model stopped: {:?}", resp.stop_reason);
                Ok(resp.message)
            }
            Err(err) => {
                error!("inference failed: {err}");
                Err(AgentError::Inference(err))
            }
        }
    }

    /// Shows the text of the message and runs the requested tools one by
    /// one, returning a result block for each request.
    async fn handle_model_message(
        &self,
        message: &Message,
    ) -> Vec<ContentBlock> {
        let mut tool_results = Vec::new();
        for block in &message.content {
            match block {
                ContentBlock::Text { text } => {
                    self.emit(AgentEvent::Transcript(text));
                }
                ContentBlock::ToolUse { id, name, input } => {
                    self.emit(AgentEvent::ToolCall { id, name, input });
                    let result =
                        self.tool_registry.dispatch(name, input.clone()).await;
                    self.emit(AgentEvent::ToolResult {
                        id,
                        name,
                        result: &result,
                    });
                    tool_results.push(match result {
                        Ok(output) => ContentBlock::tool_result(id, output, false),
                        Err(err) => {
                            ContentBlock::tool_result(id, err.reason(), true)
                        }
                    });
                }
                ContentBlock::ToolResult { .. } => {
                    warn!("ignoring tool result sent by the model");
                }
            }
        }
        tool_results
    }

    #[inline]
    fn emit(&self, event: AgentEvent<'_>) {
        if let Some(on_event) = &self.on_event {
            on_event(&event);
        }
    }
}
