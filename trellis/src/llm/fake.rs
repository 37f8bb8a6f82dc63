//! Deterministic backend for tests and examples.
//!
//! Maps each model id to a response generator; also records the last
//! request so tests can assert on attached system prompts and tool configs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::GraphError;
use crate::llm::{ConverseRequest, ConverseResponse, ModelBackend, Usage};
use crate::message::Message;

/// Deterministic response generator for one model id.
pub trait FakeModel: Send + Sync {
    /// The model id this generator answers for.
    fn model_id(&self) -> &str;

    /// Produces the assistant message for the given conversation.
    fn generate(&self, messages: &[Message]) -> Message;
}

/// Always returns the same message.
struct CannedModel {
    id: String,
    message: Message,
}

impl FakeModel for CannedModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn generate(&self, _messages: &[Message]) -> Message {
        self.message.clone()
    }
}

/// Returns scripted messages in order; the last one repeats.
struct ScriptedModel {
    id: String,
    script: Vec<Message>,
    cursor: AtomicUsize,
}

impl FakeModel for ScriptedModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn generate(&self, _messages: &[Message]) -> Message {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = index.min(self.script.len() - 1);
        self.script[index].clone()
    }
}

/// Deterministic [`ModelBackend`] for tests.
///
/// An unknown model id fails with [`GraphError::Backend`], mirroring what a
/// real adapter does for a bad model name. Streaming splits the generated
/// text into word deltas, so delta concatenation reproduces the message.
///
/// **Interaction**: stands in for a vendor adapter anywhere a
/// `&dyn ModelBackend` is taken; `last_request` exposes what callers sent.
pub struct FakeBackend {
    models: HashMap<String, Arc<dyn FakeModel>>,
    last_request: Mutex<Option<ConverseRequest>>,
}

impl FakeBackend {
    /// Creates a backend from explicit generators.
    pub fn new(models: Vec<Arc<dyn FakeModel>>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|model| (model.model_id().to_string(), model))
                .collect(),
            last_request: Mutex::new(None),
        }
    }

    /// One model that always answers with the given text.
    pub fn with_text(model_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_message(model_id, Message::assistant(text))
    }

    /// One model that always answers with the given message.
    pub fn with_message(model_id: impl Into<String>, message: Message) -> Self {
        Self::new(vec![Arc::new(CannedModel {
            id: model_id.into(),
            message,
        })])
    }

    /// One model that answers with scripted messages in order; the last
    /// message repeats once the script runs out.
    ///
    /// # Panics
    ///
    /// Panics when `script` is empty.
    pub fn with_script(model_id: impl Into<String>, script: Vec<Message>) -> Self {
        assert!(!script.is_empty(), "script must hold at least one message");
        Self::new(vec![Arc::new(ScriptedModel {
            id: model_id.into(),
            script,
            cursor: AtomicUsize::new(0),
        })])
    }

    /// The most recent request this backend served, for test assertions.
    pub fn last_request(&self) -> Option<ConverseRequest> {
        self.last_request.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ModelBackend for FakeBackend {
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, GraphError> {
        *self.last_request.lock().expect("lock") = Some(request.clone());

        let model = self
            .models
            .get(&request.model_id)
            .ok_or_else(|| GraphError::Backend(format!("unknown model id: {}", request.model_id)))?;

        Ok(ConverseResponse {
            message: model.generate(&request.messages),
            usage: Some(Usage::default()),
        })
    }

    async fn converse_streaming(
        &self,
        request: &ConverseRequest,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<ConverseResponse, GraphError> {
        let response = self.converse(request).await?;
        let text = response.message.text_blocks();
        for delta in text.split_inclusive(' ') {
            let _ = chunk_tx.send(delta.to_string()).await;
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "fake-model";

    fn request(messages: Vec<Message>) -> ConverseRequest {
        ConverseRequest::new(MODEL, messages)
    }

    /// **Scenario**: a canned model answers every call identically.
    #[tokio::test]
    async fn canned_model_repeats_message() {
        let backend = FakeBackend::with_text(MODEL, "Hello");
        for _ in 0..2 {
            let response = backend.converse(&request(vec![])).await.unwrap();
            assert_eq!(response.message, Message::assistant("Hello"));
        }
    }

    /// **Scenario**: a scripted model advances per call and repeats its last message.
    #[tokio::test]
    async fn scripted_model_advances_then_repeats() {
        let backend = FakeBackend::with_script(
            MODEL,
            vec![Message::assistant("first"), Message::assistant("second")],
        );

        let first = backend.converse(&request(vec![])).await.unwrap();
        assert_eq!(first.message, Message::assistant("first"));
        let second = backend.converse(&request(vec![])).await.unwrap();
        assert_eq!(second.message, Message::assistant("second"));
        let third = backend.converse(&request(vec![])).await.unwrap();
        assert_eq!(third.message, Message::assistant("second"));
    }

    /// **Scenario**: an unknown model id fails like a real adapter would.
    #[tokio::test]
    async fn unknown_model_id_is_backend_error() {
        let backend = FakeBackend::with_text(MODEL, "Hello");
        let err = backend
            .converse(&ConverseRequest::new("missing", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Backend(_)));
    }

    /// **Scenario**: streaming word deltas concatenate back to the full text.
    #[tokio::test]
    async fn streaming_deltas_reassemble_text() {
        let backend = FakeBackend::with_text(MODEL, "one two three");
        let (tx, mut rx) = mpsc::channel(8);
        let response = backend.converse_streaming(&request(vec![]), tx).await.unwrap();

        let mut assembled = String::new();
        while let Some(delta) = rx.recv().await {
            assembled.push_str(&delta);
        }
        assert_eq!(assembled, "one two three");
        assert_eq!(response.message.text_blocks(), "one two three");
    }
}
