//! Resumable, pull-based graph execution against a state store.
//!
//! [`GraphRunner`] steps a graph one layer per pull. Each pull re-reads the
//! state from the store, executes a layer, writes the new state back, and
//! returns the [`LayerResult`]. Because state is re-read on every pull, the
//! caller can mutate it through the store between pulls; that is the
//! injection point for user input and tool results.

use std::sync::Arc;

use crate::error::GraphError;
use crate::graph::logging::log_graph_error;
use crate::graph::{Graph, LayerResult, START};
use crate::state::StateStore;

/// Pull-based stepper over `(graph, context, store, key)`.
///
/// `next_layer` yields one [`LayerResult`] per call and `None` once the
/// graph has finished. A failed layer advances nothing (the store keeps the
/// pre-layer state and the runner keeps its position), so calling
/// `next_layer` again retries the same layer from the same predecessors.
///
/// **Interaction**: created by [`run_graph`]; the chatbot loop pulls it and
/// appends user input or tool results to the stored state between pulls.
pub struct GraphRunner<'a, C, S> {
    graph: &'a Graph<C, S>,
    context: &'a C,
    store: Arc<dyn StateStore<S>>,
    key: String,
    last_nodes_executed: Vec<String>,
    is_finished: bool,
}

impl<'a, C, S> GraphRunner<'a, C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    /// Creates a runner positioned before the first layer.
    pub fn new(
        graph: &'a Graph<C, S>,
        context: &'a C,
        store: Arc<dyn StateStore<S>>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            graph,
            context,
            store,
            key: key.into(),
            last_nodes_executed: vec![START.to_string()],
            is_finished: false,
        }
    }

    /// Executes the next layer, or returns `None` once the graph finished.
    pub async fn next_layer(&mut self) -> Option<Result<LayerResult<S>, GraphError>> {
        if self.is_finished {
            return None;
        }

        let state = match self.store.get(&self.key).await {
            Ok(state) => state,
            Err(err) => return Some(Err(err)),
        };

        let result = match self
            .graph
            .execute(self.context, &state, &self.last_nodes_executed)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                log_graph_error(&err);
                return Some(Err(err));
            }
        };

        if let Err(err) = self.store.set(&self.key, result.state.clone()).await {
            return Some(Err(err));
        }
        self.last_nodes_executed = result.nodes_executed.clone();
        self.is_finished = result.is_finished;
        Some(Ok(result))
    }

    /// Ids of the most recently executed layer (`["start"]` before the first).
    pub fn last_nodes_executed(&self) -> &[String] {
        &self.last_nodes_executed
    }

    /// Drains the runner, collecting every remaining layer.
    ///
    /// Only sensible for graphs that terminate; a cyclic graph with no
    /// path to `end` will never return.
    pub async fn collect(mut self) -> Result<Vec<LayerResult<S>>, GraphError> {
        let mut results = Vec::new();
        while let Some(result) = self.next_layer().await {
            results.push(result?);
        }
        Ok(results)
    }
}

/// Creates a [`GraphRunner`] for `(graph, context, store, key)`.
pub fn run_graph<'a, C, S>(
    graph: &'a Graph<C, S>,
    context: &'a C,
    store: Arc<dyn StateStore<S>>,
    key: impl Into<String>,
) -> GraphRunner<'a, C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    GraphRunner::new(graph, context, store, key)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::graph::{FnNode, Node, END};
    use crate::message::Message;
    use crate::state::{LocalStateStore, MessagesState};

    struct Context {
        user_id: String,
    }

    fn appender(id: &str, text: &str) -> Arc<dyn Node<Context, MessagesState>> {
        let message = Message::assistant(text);
        Arc::new(FnNode::new(id, move |_ctx: &Context, state: &MessagesState| {
            Ok(Some(state.append(message.clone())))
        }))
    }

    fn linear_graph() -> Graph<Context, MessagesState> {
        let mut graph = Graph::new();
        graph
            .add_node(appender("welcome", "Hello!"))
            .add_node(appender("assistant", "I'm a helpful AI assistant!"))
            .add_edge("welcome", "assistant")
            .add_edge("assistant", END);
        graph
    }

    /// **Scenario**: the driver yields one result per layer, ending with ["end"].
    #[tokio::test]
    async fn run_graph_yields_layer_sequence() {
        let graph = linear_graph();
        let context = Context {
            user_id: "user-1".to_string(),
        };
        let store = Arc::new(LocalStateStore::new(MessagesState::default));

        let runner = run_graph(&graph, &context, store, context.user_id.clone());
        let results = runner.collect().await.unwrap();

        let expected = vec![
            Message::assistant("Hello!"),
            Message::assistant("I'm a helpful AI assistant!"),
        ];
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].nodes_executed, vec!["welcome".to_string()]);
        assert_eq!(results[0].state.messages, expected[0..1].to_vec());
        assert_eq!(results[1].nodes_executed, vec!["assistant".to_string()]);
        assert_eq!(results[1].state.messages, expected);
        assert_eq!(results[2].nodes_executed, vec![END.to_string()]);
        assert!(results[2].is_finished);
    }

    /// **Scenario**: state written to the store between pulls is visible to the next layer.
    #[tokio::test]
    async fn user_input_injected_between_layers() {
        let graph = linear_graph();
        let context = Context {
            user_id: "user-2".to_string(),
        };
        let store: Arc<LocalStateStore<MessagesState>> =
            Arc::new(LocalStateStore::new(MessagesState::default));

        let mut runner = run_graph(&graph, &context, store.clone(), context.user_id.clone());
        let mut results = Vec::new();
        while let Some(result) = runner.next_layer().await {
            let result = result.unwrap();
            store
                .set(
                    &context.user_id,
                    result.state.append(Message::user("<user response>")),
                )
                .await
                .unwrap();
            results.push(result);
        }

        assert_eq!(
            results[1].state.messages,
            vec![
                Message::assistant("Hello!"),
                Message::user("<user response>"),
                Message::assistant("I'm a helpful AI assistant!"),
            ]
        );
        assert_eq!(results[2].nodes_executed, vec![END.to_string()]);
    }

    /// **Scenario**: a failed layer leaves the store and the runner's position
    /// untouched, so the next pull retries the same layer.
    #[tokio::test]
    async fn failed_layer_is_retried_from_same_position() {
        let fail_once = Arc::new(AtomicBool::new(true));
        let fail_flag = fail_once.clone();

        let mut graph: Graph<Context, MessagesState> = Graph::new();
        graph
            .add_node(appender("welcome", "Hello!"))
            .add_node(Arc::new(FnNode::new(
                "flaky",
                move |_ctx: &Context, state: &MessagesState| {
                    if fail_flag.swap(false, Ordering::SeqCst) {
                        Err(GraphError::Backend("transient".to_string()))
                    } else {
                        Ok(Some(state.append(Message::assistant("recovered"))))
                    }
                },
            )))
            .add_edge("welcome", "flaky")
            .add_edge("flaky", END);

        let context = Context {
            user_id: "user-3".to_string(),
        };
        let store: Arc<LocalStateStore<MessagesState>> =
            Arc::new(LocalStateStore::new(MessagesState::default));
        let mut runner = run_graph(&graph, &context, store.clone(), context.user_id.clone());

        runner.next_layer().await.unwrap().unwrap();
        assert_eq!(runner.last_nodes_executed(), ["welcome".to_string()]);

        let err = runner.next_layer().await.unwrap().unwrap_err();
        assert!(matches!(err, GraphError::Backend(_)));
        // Position and stored state are unchanged after the failure.
        assert_eq!(runner.last_nodes_executed(), ["welcome".to_string()]);
        assert_eq!(
            store.get(&context.user_id).await.unwrap().messages,
            vec![Message::assistant("Hello!")]
        );

        let result = runner.next_layer().await.unwrap().unwrap();
        assert_eq!(result.nodes_executed, vec!["flaky".to_string()]);
        assert_eq!(
            result.state.messages,
            vec![Message::assistant("Hello!"), Message::assistant("recovered")]
        );
    }

    /// **Scenario**: execute can be resumed from an explicit node id.
    #[tokio::test]
    async fn execute_from_specified_node() {
        let graph = linear_graph();
        let context = Context {
            user_id: "user-1".to_string(),
        };

        let result = graph
            .execute(&context, &MessagesState::default(), &["welcome".to_string()])
            .await
            .unwrap();
        assert_eq!(result.nodes_executed, vec!["assistant".to_string()]);
        assert_eq!(
            result.state.messages,
            vec![Message::assistant("I'm a helpful AI assistant!")]
        );
    }
}
