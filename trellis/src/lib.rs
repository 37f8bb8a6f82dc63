//! # Trellis
//!
//! A small framework for stateful, multi-turn conversational applications
//! over pluggable LLM backends. Applications are a directed graph of nodes
//! (units of work) and edges (static or conditional transitions); the
//! engine advances the graph one breadth-first **layer** at a time, updating
//! a per-user state between layers and yielding control back to the caller
//! after each one, at the natural point to render output, gather user
//! input, or execute tools.
//!
//! ## Design principles
//!
//! - **State in, state out**: nodes receive a snapshot and return a new
//!   state (or `None` for "no change"); a layer never mutates the caller's
//!   state in place, so a failing node leaves the store untouched.
//! - **One layer per pull**: [`GraphRunner`] is a pull-based stepper; the
//!   caller injects user input through the [`StateStore`] between pulls.
//! - **Routing is data**: a [`ConditionalEdge`] is a pure function of
//!   `(context, state)` returning a destination id, never a jump.
//! - **Uniform converse**: free-form, structured, and streaming generation
//!   work the same over every [`ModelBackend`], including the test-only
//!   [`FakeBackend`].
//!
//! ## Main modules
//!
//! - [`graph`]: [`Graph`], [`Node`], [`ConditionalEdge`], [`LayerResult`],
//!   [`GraphRunner`]; build and step layered graphs.
//! - [`message`]: [`Message`] and content blocks (text, toolUse, toolResult).
//! - [`state`]: [`ChatState`], [`MessagesState`], [`StateStore`],
//!   [`LocalStateStore`].
//! - [`llm`]: [`ModelBackend`], the converse façade, [`FakeBackend`],
//!   [`OllamaBackend`], [`SentenceBuffer`].
//! - [`tools`]: [`ToolSpec`] derivation, [`Tool`], dispatch of model
//!   tool calls.
//! - [`chatbot`]: the interactive turn loop ([`run_chatbot_on_cli`]).
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use trellis::{
//!     run_graph, FnNode, Graph, LocalStateStore, Message, MessagesState, END,
//! };
//!
//! #[derive(Clone)]
//! struct Context {
//!     user_id: String,
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut graph: Graph<Context, MessagesState> = Graph::new();
//! graph
//!     .add_node(Arc::new(FnNode::new("welcome", |_ctx: &Context, state: &MessagesState| {
//!         Ok(Some(state.append(Message::assistant("Hello!"))))
//!     })))
//!     .add_edge("welcome", END);
//!
//! let context = Context { user_id: "user-1".to_string() };
//! let store = Arc::new(LocalStateStore::new(MessagesState::default));
//!
//! let mut runner = run_graph(&graph, &context, store, context.user_id.clone());
//! while let Some(result) = runner.next_layer().await {
//!     let result = result.expect("layer");
//!     println!("{:?} finished={}", result.nodes_executed, result.is_finished);
//! }
//! # }
//! ```

pub mod chatbot;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod state;
pub mod tools;

pub use chatbot::{run_chatbot, run_chatbot_on_cli, ChatIo, ChatbotContext, CliIo};
pub use error::GraphError;
pub use graph::{
    run_graph, ConditionalEdge, EdgeDestination, FnEdge, FnNode, Graph, GraphRunner, LayerResult,
    Node, END, START,
};
pub use llm::{
    converse, converse_streaming, converse_with_structured_output, ConverseRequest,
    ConverseResponse, FakeBackend, FakeModel, InferenceConfig, ModelBackend, OllamaBackend,
    SentenceBuffer, ToolChoiceMode, ToolConfig, Usage,
};
pub use message::{text, ContentBlock, Message, Role};
pub use state::{ChatState, LocalStateStore, MessagesState, StateStore};
pub use tools::{
    maybe_execute_tools, FunctionTool, OneOf, Tool, ToolError, ToolParam, ToolSpec,
};
