//! Ollama backend adapter (`/api/chat`).
//!
//! Text-only adapter for locally hosted models. Each content block is
//! flattened to one `{role, content}` entry (the chat endpoint has no
//! block structure), with the system prompt first. Streaming parses the
//! endpoint's NDJSON chunks and forwards each content delta.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::error::GraphError;
use crate::llm::{ConverseRequest, ConverseResponse, ModelBackend};
use crate::message::{ContentBlock, Message, Role};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// [`ModelBackend`] over a local ollama server.
///
/// Tool configs are not mapped: the request carries only the flattened
/// conversation text, so structured output and tool use need a backend
/// whose wire format carries tool blocks.
pub struct OllamaBackend {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    message: Option<WireMessage>,
    #[serde(default)]
    done: bool,
}

impl OllamaBackend {
    /// Creates a backend against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a backend against the default local server.
    pub fn localhost() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request_body(&self, request: &ConverseRequest, stream: bool) -> Value {
        json!({
            "model": request.model_id,
            "messages": flatten_messages(&request.messages, request.system.as_deref()),
            "stream": stream,
            "options": inference_options(request),
        })
    }

    async fn post_chat(&self, body: &Value) -> Result<reqwest::Response, GraphError> {
        let response = self
            .http
            .post(self.chat_url())
            .json(body)
            .send()
            .await
            .map_err(|err| GraphError::Backend(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GraphError::Backend(format!(
                "ollama returned {}",
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl ModelBackend for OllamaBackend {
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, GraphError> {
        let body = self.request_body(request, false);
        let response = self.post_chat(&body).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| GraphError::Backend(err.to_string()))?;

        Ok(ConverseResponse {
            message: Message::assistant(parsed.message.content),
            usage: None,
        })
    }

    async fn converse_streaming(
        &self,
        request: &ConverseRequest,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<ConverseResponse, GraphError> {
        let body = self.request_body(request, true);
        let response = self.post_chat(&body).await?;

        let mut byte_stream = response.bytes_stream();
        let mut line_buffer = String::new();
        let mut full_text = String::new();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk.map_err(|err| GraphError::Backend(err.to_string()))?;
            line_buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline) = line_buffer.find('\n') {
                let line: String = line_buffer.drain(..=newline).collect();
                if let Some(delta) = parse_stream_line(line.trim())? {
                    full_text.push_str(&delta);
                    let _ = chunk_tx.send(delta).await;
                }
            }
        }
        if let Some(delta) = parse_stream_line(line_buffer.trim())? {
            full_text.push_str(&delta);
            let _ = chunk_tx.send(delta).await;
        }

        Ok(ConverseResponse {
            message: Message::assistant(full_text),
            usage: None,
        })
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    }
}

/// Flattens block-structured messages to the chat endpoint's flat entries,
/// with the system prompt first. Non-text blocks are skipped.
fn flatten_messages(messages: &[Message], system: Option<&str>) -> Vec<WireMessage> {
    let mut flattened = Vec::new();
    if let Some(prompt) = system {
        flattened.push(WireMessage {
            role: "system".to_string(),
            content: prompt.to_string(),
        });
    }

    for message in messages {
        for block in &message.content {
            if let ContentBlock::Text(text) = block {
                flattened.push(WireMessage {
                    role: role_name(message.role).to_string(),
                    content: text.clone(),
                });
            }
        }
    }
    flattened
}

fn inference_options(request: &ConverseRequest) -> Value {
    let mut options = serde_json::Map::new();
    if let Some(max_tokens) = request.inference.max_tokens {
        options.insert("num_predict".to_string(), json!(max_tokens));
    }
    if let Some(temperature) = request.inference.temperature {
        options.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(top_p) = request.inference.top_p {
        options.insert("top_p".to_string(), json!(top_p));
    }
    Value::Object(options)
}

/// Parses one NDJSON chunk line; returns the content delta, if any.
fn parse_stream_line(line: &str) -> Result<Option<String>, GraphError> {
    if line.is_empty() {
        return Ok(None);
    }
    let chunk: ChatChunk =
        serde_json::from_str(line).map_err(|err| GraphError::Backend(err.to_string()))?;
    if chunk.done {
        return Ok(None);
    }
    Ok(chunk
        .message
        .map(|message| message.content)
        .filter(|content| !content.is_empty()))
}
