//! Example: an interactive CLI chatbot with a tool.
//!
//! Runs against a scripted `FakeBackend` by default; set `OLLAMA_BASE_URL`
//! (and optionally `OLLAMA_MODEL`) in the environment or a `.env` file to
//! talk to a live local model instead. Say "bye" to end the session.
//!
//! Run: `cargo run -p trellis-examples --example chatbot_cli`

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use trellis::message::ToolUseBlock;
use trellis::tools::ToolSpec;
use trellis::{
    converse, run_chatbot_on_cli, ChatState, ChatbotContext, ConditionalEdge, ContentBlock,
    FakeBackend, FunctionTool, Graph, GraphError, InferenceConfig, LocalStateStore, Message,
    MessagesState, ModelBackend, Node, Role, Tool, END,
};

struct Context {
    user_id: String,
    model_id: String,
    backend: Arc<dyn ModelBackend>,
    tools: Vec<Arc<dyn Tool>>,
}

impl ChatbotContext for Context {
    fn user_id(&self) -> &str {
        &self.user_id
    }
    fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }
}

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
            &context.model_id,
            "You are a helpful assistant. Use the available tools when asked about the weather.",
            state.messages(),
            InferenceConfig::default(),
            Some(&context.tools),
        )
        .await?;
        Ok(Some(state.append(response.message)))
    }
}

/// Loops back to the assistant until the user says "bye".
struct ContinueOrEnd;

#[async_trait]
impl ConditionalEdge<Context, MessagesState> for ContinueOrEnd {
    async fn resolve(
        &self,
        _context: &Context,
        state: &MessagesState,
    ) -> Result<Option<String>, GraphError> {
        let done = state
            .messages
            .last()
            .is_some_and(|message| message.role == Role::User && message.text_blocks() == "bye");
        Ok(Some(if done {
            END.to_string()
        } else {
            "assistant".to_string()
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

const FAKE_MODEL: &str = "fake-model";

/// A canned session: greet, request the temperature tool, then chat.
fn scripted_backend() -> Arc<dyn ModelBackend> {
    let tool_turn = Message {
        role: Role::Assistant,
        content: vec![
            ContentBlock::Text("Let me check the temperature.".to_string()),
            ContentBlock::ToolUse(ToolUseBlock {
                tool_use_id: "use-1".to_string(),
                name: "get_temperature".to_string(),
                input: json!({"city": "San Francisco"}),
            }),
        ],
    };
    Arc::new(FakeBackend::with_script(
        FAKE_MODEL,
        vec![
            Message::assistant("Hi! Ask me about the weather."),
            tool_turn,
            Message::assistant("It's 50 degrees in San Francisco."),
            Message::assistant("Anything else?"),
        ],
    ))
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let (model_id, backend): (String, Arc<dyn ModelBackend>) =
        match env::var("OLLAMA_BASE_URL") {
            Ok(base_url) => {
                let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.1".to_string());
                (model, Arc::new(trellis::OllamaBackend::new(base_url)))
            }
            Err(_) => (FAKE_MODEL.to_string(), scripted_backend()),
        };

    let context = Context {
        user_id: "user-1".to_string(),
        model_id,
        backend,
        tools: vec![get_temperature()],
    };

    let mut graph: Graph<Context, MessagesState> = Graph::new();
    graph.add_node(Arc::new(AssistantNode)).add_edge("assistant", {
        let edge: Arc<dyn ConditionalEdge<Context, MessagesState>> = Arc::new(ContinueOrEnd);
        edge
    });

    let store = Arc::new(LocalStateStore::new(MessagesState::default));

    match run_chatbot_on_cli(&graph, &context, store).await {
        Ok(result) => {
            println!("session finished after {:?}", result.nodes_executed);
        }
        Err(err) => {
            eprintln!("session ended with error: {err}");
        }
    }
}
