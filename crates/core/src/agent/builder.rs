use tiny_agent_model::ModelProvider;

use super::{Agent, AgentEvent, BuildError};
use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::{AnyTool, Registry as ToolRegistry, Tool, ToolObject};

/// [`Agent`] builder.
pub struct AgentBuilder {
    model_client: ModelClient,
    system_prompt: Option<String>,
    on_event: Option<super::EventHandler>,
    tools: Vec<Box<dyn ToolObject>>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            system_prompt: None,
            on_event: None,
            tools: vec![],
        }
    }

    /// Sets the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Attaches a callback to be invoked for every [`AgentEvent`].
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(&AgentEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(AnyTool(tool)));
        self
    }

    /// Builds the agent.
    ///
    /// Fails if two tools share the same name.
    pub fn build(self) -> Result<Agent, BuildError> {
        let Self {
            model_client,
            system_prompt,
            on_event,
            tools,
        } = self;

        let tool_registry = ToolRegistry::with_tools(tools)?;
        let tool_definitions = tool_registry.definitions();
        Ok(Agent {
            model_client,
            tool_registry,
            tool_definitions,
            system_prompt,
            conversation: Conversation::default(),
            on_event,
        })
    }
}
