use serde::{Deserialize, Serialize};
use serde_json::Value;
use tiny_agent_model::{
    ContentBlock, ErrorKind, Message as ModelMessage, ModelRequest,
    ModelResponse, ModelTool, Role, StopReason,
};

use crate::AnthropicConfig;

// ------------------------
// Types shared in both ways
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
    // Thinking blocks, server tools, etc. are not requested by us.
    #[serde(other)]
    Unsupported,
}

#[inline]
fn is_false(value: &bool) -> bool {
    !*value
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub content: Vec<Block>,
    pub stop_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    pub r#type: String,
    pub message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    role: &'static str,
    content: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &AnthropicConfig,
) -> MessagesRequest {
    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        system: req.system.clone(),
        messages: req.messages.iter().map(create_message).collect(),
        tools: req.tools.iter().map(create_tool).collect(),
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let content = msg
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text { text } => Block::Text { text: text.clone() },
            ContentBlock::ToolUse { id, name, input } => Block::ToolUse {
                id: id.clone(),
                name: name.clone(),
                input: input.clone(),
            },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => Block::ToolResult {
                tool_use_id: tool_use_id.clone(),
                content: content.clone(),
                is_error: *is_error,
            },
        })
        .collect();
    Message { role, content }
}

#[inline]
fn create_tool(tool: &ModelTool) -> Tool {
    Tool {
        name: tool.name.clone(),
        description: tool.description.clone(),
        input_schema: tool.input_schema.clone(),
    }
}

pub fn create_response(resp: MessagesResponse) -> ModelResponse {
    let mut content = Vec::with_capacity(resp.content.len());
    for block in resp.content {
        match block {
            Block::Text { text } => content.push(ContentBlock::Text { text }),
            Block::ToolUse { id, name, input } => {
                content.push(ContentBlock::ToolUse { id, name, input })
            }
            Block::ToolResult { .. } | Block::Unsupported => {
                debug!("dropping unsupported block in message {}", resp.id);
            }
        }
    }

    let stop_reason = resp.stop_reason.as_deref().map(|reason| match reason {
        "end_turn" => StopReason::EndTurn,
        "tool_use" => StopReason::ToolUse,
        "max_tokens" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        _ => StopReason::Other,
    });

    ModelResponse {
        message: ModelMessage::assistant(content),
        stop_reason,
    }
}

/// Classifies a failed request by its status code and error body.
pub fn error_kind(status: u16, api_error: Option<&ApiError>) -> ErrorKind {
    if let Some(api_error) = api_error {
        match api_error.r#type.as_str() {
            "authentication_error" | "permission_error" => {
                return ErrorKind::Authentication;
            }
            "invalid_request_error" | "not_found_error"
            | "request_too_large" => {
                return ErrorKind::InvalidRequest;
            }
            "rate_limit_error" => return ErrorKind::RateLimitExceeded,
            "overloaded_error" => return ErrorKind::Overloaded,
            _ => {}
        }
    }
    match status {
        401 | 403 => ErrorKind::Authentication,
        400 | 404 | 413 | 422 => ErrorKind::InvalidRequest,
        429 => ErrorKind::RateLimitExceeded,
        503 | 529 => ErrorKind::Overloaded,
        _ => ErrorKind::Other,
    }
}
