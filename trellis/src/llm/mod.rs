//! LLM backends and the converse façade.
//!
//! [`ModelBackend`] is the polymorphic contract each provider adapter
//! implements; the façade functions in this module ([`converse`],
//! [`converse_with_structured_output`], [`converse_streaming`]) give nodes a
//! uniform way to do free-form, schema-constrained, and streaming
//! generation over any backend.
//!
//! # Streaming
//!
//! `converse_streaming` accepts an `mpsc::Sender<String>` and forwards text
//! deltas as the backend produces them. Backends without native streaming
//! inherit the default implementation, which sends the complete text as one
//! delta, so callers never need a capability probe.

mod backend;
mod converse;
mod fake;
mod ollama;
mod streaming;

pub use backend::{
    ConverseRequest, ConverseResponse, InferenceConfig, ModelBackend, ToolChoiceMode, ToolConfig,
    Usage,
};
pub use converse::{converse, converse_with_structured_output, STRUCTURED_OUTPUT_TOOL};
pub use fake::{FakeBackend, FakeModel};
pub use ollama::OllamaBackend;
pub use streaming::{converse_streaming, SentenceBuffer};
