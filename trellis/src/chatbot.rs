//! Interactive chatbot loop over a graph.
//!
//! Pulls the execution driver one layer at a time: renders newly appended
//! assistant messages, dispatches any tool calls the assistant requested
//! (resuming immediately, without prompting), and otherwise blocks for user
//! input before the next layer. IO goes through the [`ChatIo`] seam so the
//! loop is testable with scripted input.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;
use crate::graph::{run_graph, Graph, LayerResult};
use crate::message::{Message, Role};
use crate::state::{ChatState, StateStore};
use crate::tools::{maybe_execute_tools, Tool};

/// What the chatbot loop needs from the run context.
///
/// `user_id` doubles as the state-store key; `tools` is the registry the
/// dispatcher resolves `toolUse` blocks against.
pub trait ChatbotContext: Send + Sync {
    /// Key for the state store; one conversation per user id.
    fn user_id(&self) -> &str;

    /// Tools available to the assistant, in registration order.
    fn tools(&self) -> &[Arc<dyn Tool>];
}

/// IO seam for the chatbot loop.
///
/// [`CliIo`] is the terminal implementation; tests script a fake.
#[async_trait]
pub trait ChatIo: Send {
    /// Blocks until the user provides a line of input.
    async fn read_user_input(&mut self) -> Result<String, GraphError>;

    /// Renders one message to the user.
    fn show_message(&mut self, message: &Message);

    /// Renders an error that ended the session.
    fn show_error(&mut self, error: &GraphError);
}

const CYAN: &str = "\x1b[96m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

/// Terminal IO: colored prefixes, blocking stdin reads off the runtime.
#[derive(Debug, Default)]
pub struct CliIo;

#[async_trait]
impl ChatIo for CliIo {
    async fn read_user_input(&mut self) -> Result<String, GraphError> {
        let line = tokio::task::spawn_blocking(|| {
            print!("{GREEN}User:{RESET} ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            Ok::<String, std::io::Error>(line)
        })
        .await
        .map_err(|err| GraphError::ExecutionFailed(err.to_string()))?
        .map_err(|err| GraphError::ExecutionFailed(format!("failed to read input: {err}")))?;

        println!();
        Ok(line.trim_end().to_string())
    }

    fn show_message(&mut self, message: &Message) {
        let prefix = match message.role {
            Role::Assistant => format!("{CYAN}Assistant:{RESET}"),
            Role::User => format!("{GREEN}User:{RESET}"),
            Role::System => "System:".to_string(),
        };
        println!("{} {}\n", prefix, message.text_blocks());
    }

    fn show_error(&mut self, error: &GraphError) {
        eprintln!("error: {error}");
    }
}

/// Runs a graph as an interactive chatbot until it reaches `end`.
///
/// Per layer: render assistant messages not yet shown; then, when the last
/// message is from the assistant, either dispatch its tool calls (appending
/// the results and resuming without a prompt) or block for user input and
/// append it as a user message. Errors are shown and end the session.
pub async fn run_chatbot<C, S>(
    graph: &Graph<C, S>,
    context: &C,
    store: Arc<dyn StateStore<S>>,
    io: &mut dyn ChatIo,
) -> Result<LayerResult<S>, GraphError>
where
    C: ChatbotContext,
    S: ChatState,
{
    match chat_loop(graph, context, store, io).await {
        Ok(result) => Ok(result),
        Err(err) => {
            io.show_error(&err);
            Err(err)
        }
    }
}

async fn chat_loop<C, S>(
    graph: &Graph<C, S>,
    context: &C,
    store: Arc<dyn StateStore<S>>,
    io: &mut dyn ChatIo,
) -> Result<LayerResult<S>, GraphError>
where
    C: ChatbotContext,
    S: ChatState,
{
    let mut runner = run_graph(graph, context, store.clone(), context.user_id());
    let mut shown = 0usize;
    let mut last_result = None;

    while let Some(result) = runner.next_layer().await {
        let result = result?;

        let messages = result.state.messages();
        while shown < messages.len() {
            if messages[shown].role == Role::Assistant {
                io.show_message(&messages[shown]);
            }
            shown += 1;
        }

        if !result.is_finished {
            if let Some(last) = messages.last() {
                if last.role == Role::Assistant {
                    if let Some(results_message) =
                        maybe_execute_tools(last, context.tools()).await
                    {
                        let mut updated = result.state.clone();
                        updated.messages_mut().push(results_message);
                        store.set(context.user_id(), updated).await?;
                    } else {
                        let input = io.read_user_input().await?;
                        let mut updated = result.state.clone();
                        updated.messages_mut().push(Message::user(input));
                        store.set(context.user_id(), updated).await?;
                    }
                }
            }
        }

        last_result = Some(result);
    }

    last_result.ok_or_else(|| GraphError::ExecutionFailed("graph produced no layers".to_string()))
}

/// [`run_chatbot`] on the terminal.
pub async fn run_chatbot_on_cli<C, S>(
    graph: &Graph<C, S>,
    context: &C,
    store: Arc<dyn StateStore<S>>,
) -> Result<LayerResult<S>, GraphError>
where
    C: ChatbotContext,
    S: ChatState,
{
    let mut io = CliIo;
    run_chatbot(graph, context, store, &mut io).await
}
