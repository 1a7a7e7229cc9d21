//! A model provider for the Anthropic Messages API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, header};
use tiny_agent_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};

pub use config::{AnthropicConfig, AnthropicConfigBuilder};
use proto::{ErrorResponse, MessagesResponse};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Error type for [`AnthropicProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Anthropic Messages API provider.
#[derive(Clone, Debug)]
pub struct AnthropicProvider {
    client: Client,
    config: Arc<AnthropicConfig>,
}

impl AnthropicProvider {
    /// Creates a new `AnthropicProvider` with the given configuration.
    #[inline]
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for AnthropicProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Transport,
                    ));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                let api_error = serde_json::from_str::<ErrorResponse>(&text)
                    .ok()
                    .map(|body| body.error);
                let kind =
                    proto::error_kind(status.as_u16(), api_error.as_ref());
                let message = match api_error {
                    Some(api_error) => {
                        format!("{status}: {}", api_error.message)
                    }
                    None => format!("{status}: {text}"),
                };
                return Err(Error::new(message, kind));
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let is_json = content_type
                .and_then(|v| v.parse().ok())
                .map(|m: Mime| m.subtype() == mime::JSON)
                .unwrap_or(false);
            if !is_json {
                return Err(Error::new(
                    format!("Unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            let resp = match resp.json::<MessagesResponse>().await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Other));
                }
            };
            trace!("got a response: {resp:?}");
            Ok(proto::create_response(resp))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tiny_agent_model::{ContentBlock, Message, StopReason};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn setup_provider(
        response: ResponseTemplate,
    ) -> (MockServer, AnthropicProvider) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test_api_key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        let config = AnthropicConfigBuilder::with_api_key("test_api_key")
            .with_base_url(mock_server.uri())
            .build();
        (mock_server, AnthropicProvider::new(config))
    }

    fn hello_request() -> ModelRequest {
        ModelRequest {
            system: None,
            messages: vec![Message::user_text("Hello?")],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let (_server, provider) = setup_provider(
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "msg_123",
                "type": "message",
                "role": "assistant",
                "content": [{
                    "type": "text",
                    "text": "Hello! How can I assist you today?"
                }],
                "model": "claude-sonnet-4-5",
                "stop_reason": "end_turn",
                "stop_sequence": null,
                "usage": { "input_tokens": 12, "output_tokens": 15 }
            })),
        )
        .await;

        let resp = provider.send_request(&hello_request()).await.unwrap();
        assert_eq!(
            resp.message.content,
            vec![ContentBlock::text("Hello! How can I assist you today?")]
        );
        assert_eq!(resp.stop_reason, Some(StopReason::EndTurn));
    }

    #[tokio::test]
    async fn test_api_error() {
        let (_server, provider) = setup_provider(
            ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": {
                    "type": "rate_limit_error",
                    "message": "Number of requests has exceeded your rate limit"
                }
            })),
        )
        .await;

        let err = provider.send_request(&hello_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert!(err.message().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_unexpected_content_type() {
        let (_server, provider) = setup_provider(
            ResponseTemplate::new(200).set_body_string("<html></html>"),
        )
        .await;

        let err = provider.send_request(&hello_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let config = AnthropicConfigBuilder::with_api_key("test_api_key")
            .with_base_url("http://127.0.0.1:1")
            .build();
        let provider = AnthropicProvider::new(config);
        let err = provider.send_request(&hello_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
