//! Engine error types.
//!
//! One enum for everything that aborts a layer: routing to an unknown node,
//! node failures, structured-output mismatches, backend failures, and store
//! failures. Tool invocation failures never surface here; the dispatcher
//! converts them into error-status `toolResult` blocks instead.

use thiserror::Error;

/// Error raised while building output for, or executing, a graph layer.
///
/// A failed layer propagates to the driver's caller without advancing the
/// driver's position or touching the store, so the same layer can be retried.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge or conditional edge resolved to an id with no registered node.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A node failed (application-level failure inside `Node::run`).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A structured-output response did not validate against the target schema.
    #[error("structured output did not match schema: {0}")]
    SchemaViolation(String),

    /// An adapter-level backend failure (network, authentication, quota).
    #[error("backend error: {0}")]
    Backend(String),

    /// The state store could not service a get or set.
    #[error("state store unavailable: {0}")]
    StoreUnavailable(String),
}
