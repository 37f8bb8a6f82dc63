//! Layered conversation graphs: nodes, edges, and breadth-first execution.
//!
//! A [`Graph`] holds nodes (units of work) and edges (static or conditional
//! transitions). [`Graph::execute`] runs exactly one breadth-first layer and
//! returns a [`LayerResult`]; [`GraphRunner`] steps a graph layer by layer
//! against a state store, yielding control to the caller between layers.
//!
//! # Main types
//!
//! - [`Node`]: one unit of work `(context, state) -> Option<state>`;
//!   [`FnNode`] adapts plain closures.
//! - [`ConditionalEdge`]: routing as a pure function of `(context, state)`;
//!   [`FnEdge`] adapts plain closures.
//! - [`Graph`]: the immutable-after-construction node/edge model.
//! - [`GraphRunner`]: the resumable, pull-based execution driver.
//!
//! The reserved ids [`START`] and [`END`] mark "not yet begun" and
//! "terminated"; neither is ever a registered node.

mod conditional;
mod execution;
pub mod logging;
mod model;
mod node;

pub use conditional::{ConditionalEdge, FnEdge, RouterFn};
pub use execution::{run_graph, GraphRunner};
pub use model::{EdgeDestination, Graph, LayerResult, END, START};
pub use node::{FnNode, Node, NodeFn};
