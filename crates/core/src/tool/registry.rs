use serde_json::Value;
use tiny_agent_model::ModelTool;

use crate::agent::BuildError;
use crate::tool::{Error, ToolObject, ToolResult};

/// The fixed set of tools an agent can offer to the model.
///
/// Tools are kept in registration order, which is also the order they are
/// presented to the model.
pub struct Registry {
    tools: Vec<Box<dyn ToolObject>>,
}

impl Registry {
    pub fn with_tools(
        tools: Vec<Box<dyn ToolObject>>,
    ) -> Result<Self, BuildError> {
        for (idx, tool) in tools.iter().enumerate() {
            let name = tool.name();
            if tools[..idx].iter().any(|t| t.name() == name) {
                return Err(BuildError::DuplicateTool(name.to_owned()));
            }
        }
        Ok(Self { tools })
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&dyn ToolObject> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.tools
            .iter()
            .map(|tool| ModelTool {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema().clone(),
            })
            .collect()
    }

    /// Runs the named tool to completion.
    ///
    /// Unknown tools and malformed inputs are reported as failed results,
    /// just like failures of the tool itself.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        let Some(tool) = self.lookup(name) else {
            warn!("tool not found: {name}");
            let reason = format!("tool not found: {name}");
            return Err(Error::not_found().with_reason(reason));
        };

        trace!("dispatching {name} with args: {arguments:?}");
        let result = tool.execute(arguments).await;
        match &result {
            Ok(output) => debug!("{name} succeeded ({} bytes)", output.len()),
            Err(err) => warn!("{name} failed: {}", err.reason()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::tool::{AnyTool, ErrorKind, Tool};

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct GreetInput {
        who: String,
    }

    struct GreetTool(&'static str);

    impl Tool for GreetTool {
        type Input = GreetInput;

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Greets someone"
        }

        fn input_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            if input.who.is_empty() {
                return ready(Err(
                    Error::execution_error().with_reason("nobody to greet")
                ));
            }
            ready(Ok(format!("Hello, {}!", input.who)))
        }
    }

    fn registry() -> Registry {
        Registry::with_tools(vec![
            Box::new(AnyTool(GreetTool("greet"))),
            Box::new(AnyTool(GreetTool("wave"))),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_and_definitions() {
        let registry = registry();
        assert!(registry.lookup("wave").is_some());
        assert!(registry.lookup("shout").is_none());

        let names = registry
            .definitions()
            .into_iter()
            .map(|tool| tool.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["greet", "wave"]);
    }

    #[test]
    fn test_duplicate_names() {
        let result = Registry::with_tools(vec![
            Box::new(AnyTool(GreetTool("greet"))),
            Box::new(AnyTool(GreetTool("greet"))),
        ]);
        assert!(matches!(
            result,
            Err(BuildError::DuplicateTool(name)) if name == "greet"
        ));
    }

    #[tokio::test]
    async fn test_dispatch() {
        let registry = registry();

        let result = registry.dispatch("greet", json!({ "who": "Ann" })).await;
        assert_eq!(result.unwrap(), "Hello, Ann!");

        let err = registry.dispatch("shout", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.reason().contains("not found"));

        let err = registry.dispatch("greet", json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.reason().contains("who"));

        let err = registry
            .dispatch("greet", json!({ "who": "" }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert_eq!(err.reason(), "nobody to greet");
    }
}
