//! Example: a three-node graph with a structured-output router.
//!
//! welcome → assistant → (continue_or_end) → goodbye → end, driven layer by
//! layer with `run_graph` on a scripted `FakeBackend`, so it runs without
//! any model server.
//!
//! Run: `cargo run -p trellis-examples --example simple_graph`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use trellis::llm::STRUCTURED_OUTPUT_TOOL;
use trellis::message::ToolUseBlock;
use trellis::tools::ToolSpec;
use trellis::{
    converse, converse_with_structured_output, ChatState, ConditionalEdge, ContentBlock,
    FakeBackend, FnNode, FunctionTool, Graph, GraphError, InferenceConfig, LocalStateStore,
    Message, MessagesState, Node, Role, Tool, END,
};

const MODEL: &str = "fake-model";

/// Context a graph can utilize as it executes; never mutated by the engine.
struct Context {
    user_id: String,
    backend: Arc<FakeBackend>,
    tools: Vec<Arc<dyn Tool>>,
}

/// Extracted by the router to decide whether the user wants to keep going.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
struct ConversationDetails {
    /// True if the user wishes to keep conversing; false once they have
    /// indicated a desire to end the conversation.
    should_continue: bool,
}

/// One assistant turn from the backend, with tools attached.
struct AssistantNode;

#[async_trait]
impl Node<Context, MessagesState> for AssistantNode {
    fn id(&self) -> &str {
        "assistant"
    }

    async fn run(
        &self,
        context: &Context,
        state: &MessagesState,
    ) -> Result<Option<MessagesState>, GraphError> {
        let response = converse(
            context.backend.as_ref(),
            MODEL,
            "You are a helpful assistant.",
            state.messages(),
            InferenceConfig::default(),
            Some(&context.tools),
        )
        .await?;
        Ok(Some(state.append(response.message)))
    }
}

/// Structured-output router: loop back to the assistant, or say goodbye.
struct ContinueOrEnd;

#[async_trait]
impl ConditionalEdge<Context, MessagesState> for ContinueOrEnd {
    async fn resolve(
        &self,
        context: &Context,
        state: &MessagesState,
    ) -> Result<Option<String>, GraphError> {
        let details: ConversationDetails = converse_with_structured_output(
            context.backend.as_ref(),
            MODEL,
            state.messages(),
            "Extract the conversation details from historical messages.",
            InferenceConfig::default(),
        )
        .await?;

        Ok(Some(if details.should_continue {
            "assistant".to_string()
        } else {
            "goodbye".to_string()
        }))
    }
}

fn get_temperature() -> Arc<dyn Tool> {
    Arc::new(FunctionTool::new(
        ToolSpec::builder("get_temperature", "Returns the current temperature for a city.")
            .param::<String>("city")
            .build(),
        |_input| Ok(json!(50)),
    ))
}

/// The backend's script: one assistant turn, then a structured-output call
/// answering "do not continue".
fn scripted_backend() -> Arc<FakeBackend> {
    let stop = Message {
        role: Role::Assistant,
        content: vec![ContentBlock::ToolUse(ToolUseBlock {
            tool_use_id: "use-1".to_string(),
            name: STRUCTURED_OUTPUT_TOOL.to_string(),
            input: json!({"should_continue": false}),
        })],
    };
    Arc::new(FakeBackend::with_script(
        MODEL,
        vec![Message::assistant("Nice to meet you!"), stop],
    ))
}

#[tokio::main]
async fn main() {
    let context = Context {
        user_id: "user-1".to_string(),
        backend: scripted_backend(),
        tools: vec![get_temperature()],
    };

    let mut graph: Graph<Context, MessagesState> = Graph::new();
    graph
        .add_node(Arc::new(FnNode::new(
            "welcome",
            |_ctx: &Context, state: &MessagesState| {
                Ok(Some(state.append(Message::assistant("Hello!"))))
            },
        )))
        .add_node(Arc::new(AssistantNode))
        .add_node(Arc::new(FnNode::new(
            "goodbye",
            |_ctx: &Context, state: &MessagesState| {
                Ok(Some(state.append(Message::assistant("Goodbye!"))))
            },
        )))
        .add_edge("welcome", "assistant")
        .add_edge("assistant", {
            let edge: Arc<dyn ConditionalEdge<Context, MessagesState>> = Arc::new(ContinueOrEnd);
            edge
        })
        .add_edge("goodbye", END);

    let store = Arc::new(LocalStateStore::new(MessagesState::default));
    let mut runner = trellis::run_graph(&graph, &context, store, context.user_id.clone());

    while let Some(result) = runner.next_layer().await {
        match result {
            Ok(result) => {
                println!(
                    "layer {:?} finished={}",
                    result.nodes_executed, result.is_finished
                );
                if result.is_finished {
                    println!("\nconversation:");
                    for message in result.state.messages() {
                        println!("  {:?}: {}", message.role, message.text_blocks());
                    }
                }
            }
            Err(err) => {
                eprintln!("error: {err}");
                break;
            }
        }
    }
}
