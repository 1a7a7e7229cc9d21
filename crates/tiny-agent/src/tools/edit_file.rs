use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tiny_agent_core::tool::{Error as ToolError, Tool, ToolResult, input_schema};
use tokio::fs;

#[derive(Deserialize, JsonSchema)]
pub struct EditFileParameters {
    #[schemars(description = "The path to the file.")]
    path: String,
    #[schemars(
        description = "Text to search for - must match exactly, only the first occurrence is replaced."
    )]
    old_str: String,
    #[schemars(description = "Text to replace old_str with.")]
    new_str: String,
}

/// A tool for making a single text replacement in a file.
pub struct EditFileTool {
    input_schema: Value,
}

impl EditFileTool {
    /// Creates a new edit file tool.
    #[inline]
    pub fn new() -> Self {
        EditFileTool {
            input_schema: input_schema::<EditFileParameters>(),
        }
    }
}

impl Default for EditFileTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for EditFileTool {
    type Input = EditFileParameters;

    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        r#"
Make edits to a text file.
Replaces the first occurrence of 'old_str' with 'new_str' in the given file. 'old_str' and 'new_str' MUST be different from each other.
The file must already exist, and 'old_str' must occur in it. An empty 'old_str' inserts 'new_str' at the start of the file."#
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: EditFileParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move { edit_file(input).await }
    }
}

async fn edit_file(input: EditFileParameters) -> ToolResult {
    debug!("editing file: {}", input.path);
    let content = fs::read_to_string(&input.path).await.map_err(|err| {
        ToolError::execution_error().with_reason(format!(
            "failed to read file '{}': {err}",
            input.path
        ))
    })?;

    let edited = content.replacen(&input.old_str, &input.new_str, 1);
    if edited == content {
        let reason = if content.contains(&input.old_str) {
            "`old_str` and `new_str` are identical, the file is unchanged"
                .to_owned()
        } else {
            format!("`old_str` not found in file '{}'", input.path)
        };
        return Err(ToolError::execution_error().with_reason(reason));
    }

    fs::write(&input.path, edited).await.map_err(|err| {
        ToolError::execution_error().with_reason(format!(
            "failed to write file '{}': {err}",
            input.path
        ))
    })?;
    Ok("File edited successfully".to_owned())
}
