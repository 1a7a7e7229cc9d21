use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tiny_agent_core::tool::{Error as ToolError, Tool, ToolResult, input_schema};
use tokio::process::Command;

const NO_MATCHES: &str = "No matches found.";

#[derive(Deserialize, JsonSchema)]
pub struct SearchParameters {
    #[schemars(description = "The search pattern or regex to look for.")]
    query: String,
    #[schemars(
        description = "Optional relative path to search in. Defaults to current directory."
    )]
    path: Option<String>,
    #[serde(default)]
    #[schemars(description = "Whether the search should be case-insensitive.")]
    ignore_case: bool,
    #[schemars(
        description = "Optional maximum number of matching lines per file."
    )]
    max_count: Option<u32>,
}

/// A tool for searching file contents with ripgrep.
pub struct SearchTool {
    input_schema: Value,
    program: String,
}

impl SearchTool {
    /// Creates a new search tool that runs `rg`.
    #[inline]
    pub fn new() -> Self {
        Self::with_program("rg")
    }

    /// Creates a new search tool that runs the given ripgrep-compatible
    /// executable.
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        SearchTool {
            input_schema: input_schema::<SearchParameters>(),
            program: program.into(),
        }
    }
}

impl Default for SearchTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SearchTool {
    type Input = SearchParameters;

    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        r#"
Search for code patterns using ripgrep (rg).
Use this to find code patterns, function definitions, variable usage, or any text in the codebase.
Results are lines formatted as `path:line:text`."#
    }

    fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: SearchParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let program = self.program.clone();
        async move { run_search(&program, &input).await }
    }
}

fn build_args(input: &SearchParameters) -> Vec<String> {
    let mut args = vec![
        "--no-heading".to_owned(),
        "--with-filename".to_owned(),
        "--line-number".to_owned(),
    ];
    if input.ignore_case {
        args.push("--ignore-case".to_owned());
    }
    if let Some(max_count) = input.max_count.filter(|&n| n > 0) {
        args.push(format!("--max-count={max_count}"));
    }
    // The query may start with a dash.
    args.push("--".to_owned());
    args.push(input.query.clone());
    let path = input
        .path
        .as_deref()
        .filter(|path| !path.trim().is_empty())
        .unwrap_or(".");
    args.push(path.to_owned());
    args
}

async fn run_search(program: &str, input: &SearchParameters) -> ToolResult {
    let args = build_args(input);
    debug!("running {program} {args:?}");

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|err| {
            ToolError::execution_error()
                .with_reason(format!("failed to run {program}: {err}"))
        })?;
    interpret_output(output.status.code(), &output.stdout, &output.stderr)
}

/// Maps a ripgrep exit status to a tool result. Exit code 1 only means
/// nothing matched.
fn interpret_output(
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> ToolResult {
    match code {
        Some(0) if stdout.is_empty() => Ok(NO_MATCHES.to_owned()),
        Some(0) => Ok(String::from_utf8_lossy(stdout).into_owned()),
        Some(1) => Ok(NO_MATCHES.to_owned()),
        Some(code) => Err(ToolError::execution_error().with_reason(format!(
            "search failed with exit code {code}: {}",
            String::from_utf8_lossy(stderr).trim_end()
        ))),
        None => Err(ToolError::execution_error()
            .with_reason("search was terminated by a signal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(query: &str) -> SearchParameters {
        SearchParameters {
            query: query.to_owned(),
            path: None,
            ignore_case: false,
            max_count: None,
        }
    }

    #[test]
    fn test_build_args() {
        assert_eq!(
            build_args(&params("fn main")),
            [
                "--no-heading",
                "--with-filename",
                "--line-number",
                "--",
                "fn main",
                "."
            ]
        );

        let input = SearchParameters {
            path: Some("src".to_owned()),
            ignore_case: true,
            max_count: Some(3),
            ..params("-v")
        };
        assert_eq!(
            build_args(&input),
            [
                "--no-heading",
                "--with-filename",
                "--line-number",
                "--ignore-case",
                "--max-count=3",
                "--",
                "-v",
                "src"
            ]
        );

        for path in ["", " "] {
            let input = SearchParameters {
                path: Some(path.to_owned()),
                ..params("x")
            };
            assert_eq!(build_args(&input).last().unwrap(), ".");
        }

        let input = SearchParameters {
            max_count: Some(0),
            ..params("x")
        };
        assert!(!build_args(&input).iter().any(|a| a.starts_with("--max")));
    }

    #[test]
    fn test_interpret_output() {
        let output =
            interpret_output(Some(0), b"src/main.rs:1:fn main() {}\n", b"")
                .unwrap();
        assert_eq!(output, "src/main.rs:1:fn main() {}\n");

        assert_eq!(interpret_output(Some(0), b"", b"").unwrap(), NO_MATCHES);
        assert_eq!(
            interpret_output(Some(1), b"", b"").unwrap(),
            "No matches found."
        );

        let err = interpret_output(Some(2), b"", b"rg: nope: No such file\n")
            .unwrap_err();
        assert!(err.reason().contains("exit code 2"));
        assert!(err.reason().contains("No such file"));

        assert!(interpret_output(None, b"", b"").is_err());
    }

    /// Writes an executable shell script standing in for `rg`.
    #[cfg(unix)]
    fn fake_rg(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("rg");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_search() {
        let dir = tempfile::tempdir().unwrap();

        // Echoes the arguments back as the only match.
        let tool = SearchTool::with_program(fake_rg(&dir, r#"echo "$@""#));
        let output = tool.execute(params("main")).await.unwrap();
        assert_eq!(
            output,
            "--no-heading --with-filename --line-number -- main .\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_search_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SearchTool::with_program(fake_rg(&dir, "exit 1"));
        assert_eq!(tool.execute(params("main")).await.unwrap(), NO_MATCHES);

        let dir = tempfile::tempdir().unwrap();
        let tool = SearchTool::with_program(fake_rg(
            &dir,
            "echo 'rg: missing: No such file or directory' >&2\nexit 2",
        ));
        let err = tool.execute(params("main")).await.unwrap_err();
        assert!(err.reason().contains("exit code 2"));
        assert!(err.reason().contains("missing: No such file or directory"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let tool = SearchTool::with_program("definitely-not-ripgrep-5e1f");
        let err = tool.execute(params("main")).await.unwrap_err();
        assert!(err.reason().contains("definitely-not-ripgrep-5e1f"));
    }

    #[test]
    fn test_input_schema() {
        let schema = SearchTool::new().input_schema().clone();
        assert_eq!(schema["required"], serde_json::json!(["query"]));
        assert_eq!(schema["properties"]["max_count"]["type"], "integer");
    }
}
