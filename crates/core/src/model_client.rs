use std::pin::Pin;
use std::sync::Arc;

use tiny_agent_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
///
/// The client only moves requests and responses across the boundary. It
/// neither inspects nor changes the conversation, and it never retries.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req: ModelRequest| {
            let fut = provider.send_request(&req);
            let boxed: BoxedSendRequestFuture = Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let resp_or_err = fut.await;
                    handle_response::<P>(resp_or_err)
                }
                .instrument(trace_span!("model client req")),
            );
            boxed
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for the complete response.
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

fn handle_response<P: ModelProvider + 'static>(
    resp_or_err: Result<ModelResponse, P::Error>,
) -> SendRequestResult {
    match resp_or_err {
        Ok(resp) => {
            trace!("got a response: {resp:?}");
            Ok(resp)
        }
        Err(err) => {
            error!("got an error: {err:?}");
            Err(Box::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use tiny_agent_model::{ErrorKind, Message};
    use tiny_agent_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_user_input_step();
        model_provider.add_assistant_response_step(PresetResponse::with_text(
            "How are you?",
        ));

        let model_client = ModelClient::new(model_provider);

        for _ in 0..3 {
            let resp = model_client
                .send_request(ModelRequest {
                    system: None,
                    messages: vec![Message::user_text("Hi")],
                    tools: vec![],
                })
                .await
                .unwrap();
            assert_eq!(resp.message.text(), "How are you?");
        }
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        let model_client = ModelClient::new(model_provider);
        let err = model_client
            .send_request(ModelRequest {
                system: None,
                messages: vec![Message::user_text("Hi")],
                tools: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }
}
