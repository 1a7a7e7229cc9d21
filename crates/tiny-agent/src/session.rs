use tiny_agent_core::conversation::Conversation;
use tiny_agent_core::{
    Agent, AgentBuilder, AgentError, AgentEvent, BuildError, UserInput,
};
use tiny_agent_model::ModelProvider;

use crate::tools::*;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    search_tool: SearchTool,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider);
        Self {
            agent_builder,
            search_tool: SearchTool::new(),
        }
    }

    /// Sets the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Sets the executable used by the `search` tool, `rg` by default.
    #[inline]
    pub fn with_search_program<S: Into<String>>(mut self, program: S) -> Self {
        self.search_tool = SearchTool::with_program(program);
        self
    }

    /// Attaches a callback to be invoked for every agent event.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&AgentEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_event(on_event);
        self
    }

    /// Builds a new session with the built-in tools registered.
    pub fn build(self) -> Result<Session, BuildError> {
        let agent = self
            .agent_builder
            .with_tool(ReadFileTool::new())
            .with_tool(ListFilesTool::new())
            .with_tool(EditFileTool::new())
            .with_tool(self.search_tool)
            .build()?;

        Ok(Session { agent })
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent that you can use directly, and
/// it is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Chats until `input` is exhausted. See [`Agent::run`].
    #[inline]
    pub async fn run<I: UserInput>(
        &mut self,
        input: &mut I,
    ) -> Result<(), AgentError> {
        self.agent.run(input).await
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        self.agent.conversation()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;

    use serde_json::json;
    use tiny_agent_model::ContentBlock;
    use tiny_agent_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_builtin_tools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "- buy milk\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let mut model_provider = TestModelProvider::default();
        model_provider.add_user_input_step();
        model_provider.add_assistant_response_step(
            PresetResponse::with_content([
                ContentBlock::tool_use(
                    "call:1",
                    "edit_file",
                    json!({
                        "path": path,
                        "old_str": "milk",
                        "new_str": "eggs",
                    }),
                ),
                ContentBlock::tool_use(
                    "call:2",
                    "read_file",
                    json!({ "path": path }),
                ),
            ]),
        );
        model_provider.add_user_input_step();
        model_provider
            .add_assistant_response_step(PresetResponse::with_text("Done."));

        let mut session =
            SessionBuilder::with_model_provider(model_provider.clone())
                .build()
                .unwrap();
        let mut input =
            VecDeque::from(["Swap milk for eggs".to_owned()]);
        session.run(&mut input).await.unwrap();

        let results = &session.conversation().messages()[2].content;
        assert_eq!(
            results,
            &[
                ContentBlock::tool_result(
                    "call:1",
                    "File edited successfully",
                    false
                ),
                ContentBlock::tool_result("call:2", "- buy eggs\n", false),
            ]
        );

        let tools = model_provider.requests()[0]
            .tools
            .iter()
            .map(|tool| tool.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(tools, ["read_file", "list_files", "edit_file", "search"]);
    }
}
