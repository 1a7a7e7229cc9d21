//! A terminal chat with a coding agent, built on `tiny-agent`.

#[macro_use]
extern crate tracing;

use std::env;
use std::fmt::Display;
use std::io::Write as _;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tiny_agent::SessionBuilder;
use tiny_agent::core::tool::ToolResult;
use tiny_agent::core::{AgentEvent, UserInput};
use tiny_agent_anthropic_model::{
    AnthropicConfig, AnthropicConfigBuilder, AnthropicProvider,
};
use tokio::io::{self, AsyncBufReadExt, BufReader, Stdin};

const BAR_CHAR: &str = "▎";
const MAX_RESULT_CHARS: usize = 200;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(|key| env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => return fatal(err),
    };
    debug!("using model: {}", config.model());
    let model_provider = AnthropicProvider::new(config);

    let renderer = Renderer::new();
    let session = SessionBuilder::with_model_provider(model_provider)
        .with_system_prompt(
            include_str!("./system_prompt.md")
                .replace("{{HOST_OS}}", host_os()),
        )
        .on_event(move |event| renderer.render(event))
        .build();
    let mut session = match session {
        Ok(session) => session,
        Err(err) => return fatal(err),
    };

    println!("Chat with the agent (use 'ctrl-c' to quit)");
    let mut input = StdinInput::new();
    if let Err(err) = session.run(&mut input).await {
        return fatal(err);
    }
    ExitCode::SUCCESS
}

/// Reports an error that ends the program.
fn fatal(err: impl Display) -> ExitCode {
    eprintln!("{}", fatal_message(&err));
    ExitCode::FAILURE
}

fn fatal_message(err: &impl Display) -> String {
    format!("{} {err}", "error:".bright_red().bold())
}

/// Reads the provider configuration, `get` looks up an environment variable.
fn load_config(
    get: impl Fn(&str) -> Option<String>,
) -> Result<AnthropicConfig, String> {
    let api_key = get("ANTHROPIC_API_KEY").filter(|key| !key.is_empty());
    let Some(api_key) = api_key else {
        return Err("ANTHROPIC_API_KEY environment variable is not set".into());
    };

    let mut builder = AnthropicConfigBuilder::with_api_key(api_key);
    if let Some(model) = get("ANTHROPIC_MODEL") {
        builder = builder.with_model(model);
    }
    if let Some(base_url) = get("ANTHROPIC_BASE_URL") {
        builder = builder.with_base_url(base_url);
    }
    if let Some(max_tokens) = get("ANTHROPIC_MAX_TOKENS") {
        let Ok(max_tokens) = max_tokens.trim().parse() else {
            return Err(format!(
                "ANTHROPIC_MAX_TOKENS is not a valid number: '{max_tokens}'"
            ));
        };
        builder = builder.with_max_tokens(max_tokens);
    }
    Ok(builder.build())
}

/// Reads user input line by line from stdin.
struct StdinInput {
    reader: BufReader<Stdin>,
}

impl StdinInput {
    fn new() -> Self {
        Self {
            reader: BufReader::new(io::stdin()),
        }
    }
}

impl UserInput for StdinInput {
    async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => {
                let len = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(len);
                Some(line)
            }
            Err(err) => {
                error!("error reading input: {}", err);
                None
            }
        }
    }
}

/// Prints agent events to the terminal.
struct Renderer {
    progress_style: ProgressStyle,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl Renderer {
    fn new() -> Self {
        let progress_style =
            ProgressStyle::with_template("{spinner} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        Self {
            progress_style,
            progress_bar: Mutex::new(None),
        }
    }

    fn render(&self, event: &AgentEvent<'_>) {
        match event {
            AgentEvent::AwaitingInput => {
                print!("{}: ", "You".bright_blue().bold());
                std::io::stdout().flush().ok();
            }
            AgentEvent::InferenceStarted => {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.set_style(self.progress_style.clone());
                progress_bar.set_message("🤔 Thinking...");
                progress_bar.enable_steady_tick(Duration::from_millis(100));
                if let Ok(mut slot) = self.progress_bar.lock() {
                    *slot = Some(progress_bar);
                }
            }
            AgentEvent::InferenceFinished => {
                // Finish the progress bar before printing anything else.
                let progress_bar =
                    self.progress_bar.lock().ok().and_then(|mut p| p.take());
                if let Some(progress_bar) = progress_bar {
                    progress_bar.finish_and_clear();
                }
            }
            AgentEvent::Transcript(text) => {
                println!(
                    "{}🤖 {}",
                    BAR_CHAR.bright_cyan(),
                    text.bright_white()
                );
            }
            AgentEvent::ToolCall { name, input, .. } => {
                println!(
                    "{}🔧 {}({})",
                    BAR_CHAR.bright_green(),
                    name.bold(),
                    input.dimmed()
                );
            }
            AgentEvent::ToolResult { result, .. } => {
                print_tool_result(result);
            }
        }
    }
}

fn print_tool_result(result: &ToolResult) {
    match result {
        Ok(output) => {
            let summary = summarize(output);
            println!("{}  {}", BAR_CHAR.bright_green(), summary.dimmed());
        }
        Err(err) => {
            let summary = summarize(&err.reason());
            println!("{}⚠️  {}", BAR_CHAR.bright_red(), summary.red());
        }
    }
}

/// Shortens a tool output to a single display line.
fn summarize(output: &str) -> String {
    let line_count = output.lines().count();
    let first_line = output.lines().next().unwrap_or_default();
    let mut summary =
        first_line.chars().take(MAX_RESULT_CHARS).collect::<String>();
    if summary.len() < first_line.len() {
        summary.push('…');
    }
    if line_count > 1 {
        summary.push_str(&format!(" (+{} more lines)", line_count - 1));
    }
    summary
}

#[inline]
fn host_os() -> &'static str {
    let os = std::env::consts::OS;
    match os {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        _ => "some other OS",
    }
}
