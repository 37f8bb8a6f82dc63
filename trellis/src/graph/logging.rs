//! Logging helpers for graph execution.
//!
//! Thin wrappers over `tracing` so every layer and node emits structured
//! events with consistent field names.

use crate::error::GraphError;

/// Log the start of a layer, with the ids it resolves from.
pub fn log_layer_start(from_nodes: &[String]) {
    tracing::debug!(from_nodes = ?from_nodes, "starting layer");
}

/// Log the completion of a layer.
pub fn log_layer_complete(nodes_executed: &[String], is_finished: bool) {
    tracing::debug!(nodes_executed = ?nodes_executed, is_finished, "layer complete");
}

/// Log node execution start.
pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id, "starting node");
}

/// Log node execution completion.
pub fn log_node_complete(node_id: &str) {
    tracing::debug!(node_id, "node complete");
}

/// Log an error that aborted the current layer.
pub fn log_graph_error(error: &GraphError) {
    tracing::error!(?error, "graph execution error");
}
