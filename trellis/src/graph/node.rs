//! Graph node trait: one unit of work in a layer.
//!
//! Receives the run context and the current state snapshot, returns the
//! updated state, or `None` for "no state change". Side effects (LLM calls,
//! I/O) happen inside `run`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;

/// One unit of work in a graph layer.
///
/// `run` receives the shared context and the layer's state snapshot and
/// returns `Some(new_state)` to replace it, or `None` to leave it unchanged
/// (distinct from returning an equal state by value). Nodes in a layer run
/// strictly in frontier order; an error aborts the whole layer.
///
/// **Interaction**: registered with [`Graph::add_node`](super::Graph::add_node);
/// `id` becomes the node id unless an explicit id is given.
#[async_trait]
pub trait Node<C, S>: Send + Sync
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    /// Symbolic name; the default node id within a graph.
    fn id(&self) -> &str;

    /// One step: read context and state, return the updated state or `None`.
    async fn run(&self, context: &C, state: &S) -> Result<Option<S>, GraphError>;
}

/// Body of an [`FnNode`]: `(context, state) -> updated state or None`.
pub type NodeFn<C, S> = Arc<dyn Fn(&C, &S) -> Result<Option<S>, GraphError> + Send + Sync>;

/// Adapts a plain closure into a [`Node`], so closures are first-class nodes.
///
/// The closure is synchronous; nodes that await (e.g. converse calls)
/// implement [`Node`] directly.
pub struct FnNode<C, S> {
    id: String,
    func: NodeFn<C, S>,
}

impl<C, S> FnNode<C, S> {
    /// Creates a node with the given id and body.
    pub fn new(
        id: impl Into<String>,
        func: impl Fn(&C, &S) -> Result<Option<S>, GraphError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<C, S> Node<C, S> for FnNode<C, S>
where
    C: Send + Sync,
    S: Clone + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, context: &C, state: &S) -> Result<Option<S>, GraphError> {
        (self.func)(context, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: an FnNode exposes its id and runs its closure.
    #[tokio::test]
    async fn fn_node_runs_closure() {
        let node: FnNode<(), u32> = FnNode::new("double", |_ctx, state| Ok(Some(state * 2)));
        assert_eq!(node.id(), "double");
        assert_eq!(node.run(&(), &21).await.unwrap(), Some(42));
    }

    /// **Scenario**: returning None means "no state change".
    #[tokio::test]
    async fn fn_node_none_keeps_state() {
        let node: FnNode<(), u32> = FnNode::new("noop", |_ctx, _state| Ok(None));
        assert_eq!(node.run(&(), &7).await.unwrap(), None);
    }
}
