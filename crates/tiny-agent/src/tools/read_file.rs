use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tiny_agent_core::tool::{Error as ToolError, Tool, ToolResult, input_schema};
use tokio::fs;

#[derive(Deserialize, JsonSchema)]
pub struct ReadFileParameters {
    #[schemars(description = "The relative path of a file in the working directory.")]
    path: String,
}

/// A tool for reading the whole content of a file.
pub struct ReadFileTool {
    input_schema: Value,
}

impl ReadFileTool {
    /// Creates a new read file tool.
    #[inline]
    pub fn new() -> Self {
        ReadFileTool {
            input_schema: input_schema::<ReadFileParameters>(),
        }
    }
}

impl Default for ReadFileTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ReadFileTool {
    type Input = ReadFileParameters;

    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        r#"
Read the contents of a given relative file path.
Use this when you want to see what's inside a file. Do not use this with directory names."#
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ReadFileParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            debug!("reading file: {}", input.path);
            let bytes = fs::read(&input.path).await.map_err(|err| {
                ToolError::execution_error().with_reason(format!(
                    "failed to read file '{}': {err}",
                    input.path
                ))
            })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
