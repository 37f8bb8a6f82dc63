//! Graph data model and single-layer breadth-first execution.
//!
//! Build with `add_node` / `add_edge`, then call `execute` with the ids of
//! the previously executed layer. One call runs exactly one layer: resolve
//! the frontier from the outgoing edges (evaluating conditional edges
//! against the current state), then run each frontier node in order against
//! a fresh copy of the state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GraphError;
use crate::graph::logging::{log_layer_complete, log_layer_start, log_node_complete, log_node_start};
use crate::graph::{ConditionalEdge, Node};

/// Reserved id marking "execution has not yet begun". Never a node id.
pub const START: &str = "start";

/// Reserved id marking termination. Never a node id.
pub const END: &str = "end";

/// One outgoing transition from a source node.
///
/// Static destinations name a node directly (or [`END`]); conditional
/// destinations defer the choice to routing time.
pub enum EdgeDestination<C, S> {
    /// A fixed destination node id (or [`END`]).
    Node(String),
    /// A destination decided per layer from `(context, state)`.
    Conditional(Arc<dyn ConditionalEdge<C, S>>),
}

impl<C, S> From<&str> for EdgeDestination<C, S> {
    fn from(id: &str) -> Self {
        Self::Node(id.to_string())
    }
}

impl<C, S> From<String> for EdgeDestination<C, S> {
    fn from(id: String) -> Self {
        Self::Node(id)
    }
}

impl<C, S> From<Arc<dyn ConditionalEdge<C, S>>> for EdgeDestination<C, S> {
    fn from(edge: Arc<dyn ConditionalEdge<C, S>>) -> Self {
        Self::Conditional(edge)
    }
}

impl<C, S> From<&Arc<dyn Node<C, S>>> for EdgeDestination<C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    /// A node reference as a destination resolves to the node's id.
    fn from(node: &Arc<dyn Node<C, S>>) -> Self {
        Self::Node(node.id().to_string())
    }
}

/// Result of executing one layer.
///
/// `nodes_executed` is the resolved frontier (or `["end"]` when the graph
/// terminated); feed it back as `from_nodes` to run the next layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerResult<S> {
    /// The state after the layer (a fresh value; the input is untouched).
    pub state: S,
    /// Ids of the nodes that ran, in execution order.
    pub nodes_executed: Vec<String>,
    /// True when the layer resolved to [`END`].
    pub is_finished: bool,
}

/// A conversation graph: nodes plus static and conditional edges.
///
/// Graphs are executed one breadth-first layer at a time; a layer is the
/// natural granularity for an LLM application: one "turn" of work, after
/// which the caller can render output or collect input. Cycles are
/// permitted; termination is purely data-driven (an edge to [`END`] or an
/// empty resolved frontier).
///
/// **Interaction**: driven by [`GraphRunner`](super::GraphRunner) against a
/// [`StateStore`](crate::state::StateStore), or called directly with the
/// previous layer's `nodes_executed`.
pub struct Graph<C, S> {
    nodes: HashMap<String, Arc<dyn Node<C, S>>>,
    root_node: Option<String>,
    /// Outgoing destinations per source id, in insertion order.
    edges: HashMap<String, Vec<EdgeDestination<C, S>>>,
}

impl<C, S> Default for Graph<C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S> Graph<C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            root_node: None,
            edges: HashMap::new(),
        }
    }

    /// Registers a node under its own id ([`Node::id`]).
    ///
    /// The first registered node becomes the root unless [`set_root`]
    /// overrides it later.
    ///
    /// [`set_root`]: Graph::set_root
    pub fn add_node(&mut self, node: Arc<dyn Node<C, S>>) -> &mut Self {
        let id = node.id().to_string();
        self.add_node_with_id(id, node)
    }

    /// Registers a node under an explicit id, so closures and reused node
    /// values can appear under any name.
    pub fn add_node_with_id(&mut self, id: impl Into<String>, node: Arc<dyn Node<C, S>>) -> &mut Self {
        let id = id.into();
        self.nodes.insert(id.clone(), node);
        if self.root_node.is_none() {
            self.root_node = Some(id);
        }
        self
    }

    /// Marks `id` as the entry node, overriding the first-inserted default.
    pub fn set_root(&mut self, id: impl Into<String>) -> &mut Self {
        self.root_node = Some(id.into());
        self
    }

    /// Appends a destination to the source's outgoing edges.
    ///
    /// Destinations fire in insertion order when the source appears in a
    /// layer. Accepts ids, node references, and conditional edges via
    /// [`EdgeDestination`]'s `From` impls.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<EdgeDestination<C, S>>,
    ) -> &mut Self {
        self.edges
            .entry(source.into())
            .or_default()
            .push(destination.into());
        self
    }

    /// The entry node id, when any node is registered.
    pub fn root_node(&self) -> Option<&str> {
        self.root_node.as_deref()
    }

    /// Ids of all registered nodes (arbitrary order).
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Executes a single layer and returns a copy of the updated state.
    ///
    /// `from_nodes` is the previous layer's `nodes_executed` (`["start"]`
    /// to begin). The input state is never mutated; the layer runs against
    /// a fresh clone, so a failing node leaves the caller's state intact.
    pub async fn execute(
        &self,
        context: &C,
        state: &S,
        from_nodes: &[String],
    ) -> Result<LayerResult<S>, GraphError> {
        let mut layer_state = state.clone();
        log_layer_start(from_nodes);

        let frontier = self.resolve_frontier(context, &layer_state, from_nodes).await?;

        if frontier == [END] {
            log_layer_complete(&frontier, true);
            return Ok(LayerResult {
                state: layer_state,
                nodes_executed: frontier,
                is_finished: true,
            });
        }

        for id in &frontier {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
            log_node_start(id);
            if let Some(updated) = node.run(context, &layer_state).await? {
                layer_state = updated;
            }
            log_node_complete(id);
        }

        log_layer_complete(&frontier, false);
        Ok(LayerResult {
            state: layer_state,
            nodes_executed: frontier,
            is_finished: false,
        })
    }

    /// Resolves the next frontier from the previous layer's ids.
    ///
    /// Discovery order is preserved and duplicates are kept: two
    /// predecessors routing to the same node legitimately run it twice in
    /// one layer. An empty resolution becomes `["end"]`.
    async fn resolve_frontier(
        &self,
        context: &C,
        state: &S,
        from_nodes: &[String],
    ) -> Result<Vec<String>, GraphError> {
        if from_nodes == [START] {
            let root = self
                .root_node
                .clone()
                .ok_or_else(|| GraphError::UnknownNode(START.to_string()))?;
            return Ok(vec![root]);
        }

        let mut frontier: Vec<String> = Vec::new();
        for source in from_nodes {
            let Some(destinations) = self.edges.get(source) else {
                continue;
            };
            for destination in destinations {
                match destination {
                    EdgeDestination::Node(id) => frontier.push(id.clone()),
                    EdgeDestination::Conditional(edge) => {
                        if let Some(id) = edge.resolve(context, state).await? {
                            if id != END && !self.nodes.contains_key(&id) {
                                return Err(GraphError::UnknownNode(id));
                            }
                            frontier.push(id);
                        }
                    }
                }
            }
        }

        if frontier.is_empty() {
            frontier.push(END.to_string());
        }
        Ok(frontier)
    }
}
