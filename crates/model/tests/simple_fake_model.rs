use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;

use serde_json::json;
use tiny_agent_model::{
    ContentBlock, ErrorKind, Message, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelTool, Role, StopReason,
};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user text, and asks for the first offered tool when the
/// user mentions it by name.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            let Some(last) = req.messages.last() else {
                break 'blk Err(FakeModelProviderError(
                    ErrorKind::InvalidRequest,
                ));
            };
            if last.role != Role::User {
                break 'blk Err(FakeModelProviderError(
                    ErrorKind::InvalidRequest,
                ));
            }

            let said = last.text();
            let mut content = vec![ContentBlock::text(format!("You said {said}"))];
            let mut stop_reason = StopReason::EndTurn;
            if let Some(tool) = req.tools.iter().find(|t| said.contains(&t.name))
            {
                content.push(ContentBlock::tool_use(
                    "call:0",
                    &tool.name,
                    json!({}),
                ));
                stop_reason = StopReason::ToolUse;
            }

            Ok(ModelResponse {
                message: Message::assistant(content),
                stop_reason: Some(stop_reason),
            })
        };
        ready(result)
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        system: None,
        messages: vec![Message::user_text("Good morning")],
        tools: vec![],
    };
    let resp = provider.send_request(&req).await.unwrap();

    assert_eq!(resp.message.role, Role::Assistant);
    assert_eq!(resp.message.text(), "You said Good morning");
    assert_eq!(resp.stop_reason, Some(StopReason::EndTurn));
    assert_eq!(resp.message.tool_uses().count(), 0);
}

#[tokio::test]
async fn test_tool_use() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        system: Some("Be brief.".to_owned()),
        messages: vec![Message::user_text("please run list_files")],
        tools: vec![ModelTool {
            name: "list_files".to_owned(),
            description: "Lists files.".to_owned(),
            input_schema: json!({ "type": "object", "properties": {} }),
        }],
    };
    let resp = provider.send_request(&req).await.unwrap();

    assert_eq!(resp.stop_reason, Some(StopReason::ToolUse));
    let tool_uses = resp.message.tool_uses().collect::<Vec<_>>();
    assert_eq!(tool_uses.len(), 1);
    assert_eq!(tool_uses[0].1, "list_files");
}

#[tokio::test]
async fn test_error() {
    let provider = FakeModelProvider;
    let req = ModelRequest::default();
    let result = provider.send_request(&req).await;
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}
