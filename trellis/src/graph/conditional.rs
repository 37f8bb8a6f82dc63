//! Conditional edges: route to the next node based on context and state.
//!
//! A conditional edge is a pure function of `(context, state)` returning the
//! destination node id, or `None` to drop the branch. Routing is data, not a
//! jump: the graph evaluates the edge once per layer while resolving the
//! frontier.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraphError;

/// Routing decision evaluated at frontier-resolution time.
///
/// Returning `Some(id)` routes to that node (or [`END`](super::END));
/// returning `None` contributes nothing to the layer. An id with no
/// registered node raises [`GraphError::UnknownNode`].
///
/// **Interaction**: attached via
/// [`Graph::add_edge`](super::Graph::add_edge) as an
/// [`EdgeDestination::Conditional`](super::EdgeDestination); the resolver may
/// itself converse with a backend (e.g. structured-output routers).
#[async_trait]
pub trait ConditionalEdge<C, S>: Send + Sync {
    /// Resolves the destination for the current `(context, state)`.
    async fn resolve(&self, context: &C, state: &S) -> Result<Option<String>, GraphError>;
}

/// Routing function: `(context, state) -> destination id or None`.
pub type RouterFn<C, S> = Arc<dyn Fn(&C, &S) -> Option<String> + Send + Sync>;

/// Adapts a plain closure into a [`ConditionalEdge`].
///
/// The closure is synchronous; routers that await (e.g. structured-output
/// extraction) implement [`ConditionalEdge`] directly.
pub struct FnEdge<C, S> {
    func: RouterFn<C, S>,
}

impl<C, S> FnEdge<C, S> {
    /// Creates a conditional edge from a routing closure.
    pub fn new(func: impl Fn(&C, &S) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl<C, S> ConditionalEdge<C, S> for FnEdge<C, S>
where
    C: Send + Sync,
    S: Send + Sync,
{
    async fn resolve(&self, context: &C, state: &S) -> Result<Option<String>, GraphError> {
        Ok((self.func)(context, state))
    }
}
