//! Keyed state store trait.

use async_trait::async_trait;

use crate::error::GraphError;

/// Keyed storage for graph state between layers.
///
/// `get` returns the last value written for `key`, or a freshly produced
/// default when no value exists. Semantics are get-latest / last-writer-wins;
/// implementations may back onto durable storage as long as that holds.
///
/// **Interaction**: the execution driver reads the state before each layer
/// and writes it back after a successful one; the chatbot loop writes user
/// input and tool results between pulls.
#[async_trait]
pub trait StateStore<T>: Send + Sync {
    /// Returns the state for `key`, or a default when absent.
    async fn get(&self, key: &str) -> Result<T, GraphError>;

    /// Replaces the state for `key`.
    async fn set(&self, key: &str, state: T) -> Result<(), GraphError>;
}
