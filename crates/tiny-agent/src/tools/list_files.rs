use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tiny_agent_core::tool::{Error as ToolError, Tool, ToolResult, input_schema};
use tokio::task::spawn_blocking;
use walkdir::WalkDir;

#[derive(Deserialize, JsonSchema)]
pub struct ListFilesParameters {
    #[schemars(
        description = "Optional relative path to list files from. Defaults to current directory if not provided."
    )]
    path: Option<String>,
}

/// A tool for listing files and directories recursively.
pub struct ListFilesTool {
    input_schema: Value,
}

impl ListFilesTool {
    /// Creates a new list files tool.
    #[inline]
    pub fn new() -> Self {
        ListFilesTool {
            input_schema: input_schema::<ListFilesParameters>(),
        }
    }
}

impl Default for ListFilesTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ListFilesTool {
    type Input = ListFilesParameters;

    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        r#"
List files and directories at a given path. If no path is provided, lists files in the current directory.
Returns a JSON array of paths relative to the given path. Directories have a trailing slash."#
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ListFilesParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            let dir = input
                .path
                .as_deref()
                .filter(|path| !path.trim().is_empty())
                .unwrap_or(".");
            let dir = PathBuf::from(dir);
            debug!("listing files in: {}", dir.display());
            let files = spawn_blocking(move || list_files(&dir))
                .await
                .map_err(|_| {
                    ToolError::execution_error()
                        .with_reason("Failed to list files")
                })??;
            serde_json::to_string(&files).map_err(|err| {
                ToolError::execution_error().with_reason(err.to_string())
            })
        }
    }
}

/// Walks `dir` recursively in file name order. The root itself is not
/// included, and any error while walking fails the whole listing.
fn list_files(dir: &Path) -> Result<Vec<String>, ToolError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            ToolError::execution_error().with_reason(format!(
                "failed to list files in '{}': {err}",
                dir.display()
            ))
        })?;
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };

        let mut name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if entry.file_type().is_dir() {
            name.push('/');
        }
        files.push(name);
    }
    Ok(files)
}
