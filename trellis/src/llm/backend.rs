//! The backend contract and converse request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::GraphError;
use crate::message::Message;
use crate::tools::ToolSpec;

/// Sampling parameters for one converse call. All fields optional; backends
/// apply their own defaults for unset values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// How the model may use the attached tools.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model picks between a plain message and tool calls.
    #[default]
    Auto,
    /// Model must call at least one tool.
    Any,
    /// Model must call the named tool.
    Tool(String),
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "any" => Ok(Self::Any),
            _ => Err(format!("unknown tool_choice: {} (use auto or any)", s)),
        }
    }
}

/// Tools attached to a converse call, plus the choice mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolConfig {
    pub tools: Vec<ToolSpec>,
    pub tool_choice: ToolChoiceMode,
}

/// One converse call: model, conversation, and optional system/tooling.
#[derive(Debug, Clone)]
pub struct ConverseRequest {
    pub model_id: String,
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub inference: InferenceConfig,
    pub tool_config: Option<ToolConfig>,
}

impl ConverseRequest {
    /// Creates a request with no system prompt, default inference, no tools.
    pub fn new(model_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model_id: model_id.into(),
            messages,
            system: None,
            inference: InferenceConfig::default(),
            tool_config: None,
        }
    }

    /// Sets the system prompt.
    pub fn with_system(mut self, prompt: impl Into<String>) -> Self {
        self.system = Some(prompt.into());
        self
    }

    /// Sets the sampling parameters.
    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Attaches tools.
    pub fn with_tool_config(mut self, tool_config: ToolConfig) -> Self {
        self.tool_config = Some(tool_config);
        self
    }
}

/// Token usage for one converse call, when the backend reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Response from one converse call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseResponse {
    /// The assistant message (text and/or `toolUse` blocks).
    pub message: Message,
    pub usage: Option<Usage>,
}

/// Polymorphic contract implemented by each LLM provider adapter.
///
/// One implementation per vendor, plus [`FakeBackend`](super::FakeBackend)
/// for tests. Adapter failures (network, auth, quota) surface as
/// [`GraphError::Backend`] and abort the calling layer.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// One-shot, non-streaming generation.
    async fn converse(&self, request: &ConverseRequest) -> Result<ConverseResponse, GraphError>;

    /// Streaming generation: forward text deltas through `chunk_tx`, then
    /// return the complete response.
    ///
    /// Default implementation calls [`converse`](Self::converse) and sends
    /// the full text as a single delta, so backends without native
    /// streaming still satisfy the contract.
    async fn converse_streaming(
        &self,
        request: &ConverseRequest,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<ConverseResponse, GraphError> {
        let response = self.converse(request).await?;
        let text = response.message.text_blocks();
        if !text.is_empty() {
            let _ = chunk_tx.send(text).await;
        }
        Ok(response)
    }
}
