//! Streaming converse and sentence-boundary chunking.

use tokio::sync::mpsc;

use crate::error::GraphError;
use crate::llm::{ConverseRequest, InferenceConfig, ModelBackend};
use crate::message::Message;

/// Streaming generation: forward text deltas, return the final message.
///
/// Deltas arrive on `chunk_tx` as the backend produces them; the returned
/// message is the backend's assembled assistant message. Downstream
/// consumers that want logical chunks instead of raw deltas feed the deltas
/// through a [`SentenceBuffer`].
pub async fn converse_streaming(
    backend: &dyn ModelBackend,
    model_id: &str,
    prompt: &str,
    messages: &[Message],
    config: InferenceConfig,
    chunk_tx: mpsc::Sender<String>,
) -> Result<Message, GraphError> {
    let request = ConverseRequest::new(model_id, messages.to_vec())
        .with_system(prompt)
        .with_inference(config);

    let response = backend.converse_streaming(&request, chunk_tx).await?;
    Ok(response.message)
}

/// Accumulates streamed deltas and flushes at sentence boundaries.
///
/// A boundary is any of `.` `!` `?` `;`. `push` returns the complete
/// sentences the new delta finished (possibly several, possibly none);
/// `finish` returns whatever trailing text never reached a boundary.
#[derive(Debug, Default)]
pub struct SentenceBuffer {
    buffer: String,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a delta and drains any completed sentences.
    pub fn push(&mut self, delta: &str) -> Vec<String> {
        self.buffer.push_str(delta);

        let mut chunks = Vec::new();
        while let Some(index) = self.buffer.find(['.', '!', '?', ';']) {
            let chunk: String = self.buffer.drain(..=index).collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }
        }
        chunks
    }

    /// Returns the unterminated tail, if any.
    pub fn finish(self) -> Option<String> {
        let tail = self.buffer.trim();
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeBackend;

    /// **Scenario**: deltas flush once a sentence boundary arrives.
    #[test]
    fn sentence_buffer_flushes_on_boundaries() {
        let mut buffer = SentenceBuffer::new();
        assert!(buffer.push("Hello").is_empty());
        assert_eq!(buffer.push(" there. How"), vec!["Hello there.".to_string()]);
        assert_eq!(buffer.push(" are you? Fine;"), vec![
            "How are you?".to_string(),
            "Fine;".to_string(),
        ]);
        assert_eq!(buffer.finish(), None);
    }

    /// **Scenario**: one delta holding several sentences flushes them all.
    #[test]
    fn sentence_buffer_splits_multiple_sentences_in_one_delta() {
        let mut buffer = SentenceBuffer::new();
        let chunks = buffer.push("One. Two! Three");
        assert_eq!(chunks, vec!["One.".to_string(), "Two!".to_string()]);
        assert_eq!(buffer.finish(), Some("Three".to_string()));
    }

    /// **Scenario**: converse_streaming returns the assembled assistant message.
    #[tokio::test]
    async fn converse_streaming_returns_assembled_message() {
        let backend = FakeBackend::with_text("fake-model", "All done. Goodbye!");
        let (tx, mut rx) = tokio::sync::mpsc::channel(16);

        let message = converse_streaming(
            &backend,
            "fake-model",
            "You are a helpful assistant.",
            &[],
            InferenceConfig::default(),
            tx,
        )
        .await
        .unwrap();
        assert_eq!(message.text_blocks(), "All done. Goodbye!");

        let mut sentences = Vec::new();
        let mut buffer = SentenceBuffer::new();
        while let Some(delta) = rx.recv().await {
            sentences.extend(buffer.push(&delta));
        }
        sentences.extend(buffer.finish());
        assert_eq!(sentences, vec!["All done.".to_string(), "Goodbye!".to_string()]);
    }
}
