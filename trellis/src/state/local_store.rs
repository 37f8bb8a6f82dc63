//! In-memory state store. Not persistent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::GraphError;
use crate::state::StateStore;

/// In-memory [`StateStore`] backed by a map, with a default-state factory.
///
/// Missing keys yield a freshly produced default rather than an error, so a
/// first `get` for a new user id starts a new conversation.
///
/// **Interaction**: used as `Arc<dyn StateStore<S>>` by the execution driver
/// and the chatbot loop; production deployments substitute a durable
/// implementation with the same get-latest semantics.
pub struct LocalStateStore<T> {
    state: RwLock<HashMap<String, T>>,
    default_state: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> LocalStateStore<T> {
    /// Creates an empty store with the given default-state factory.
    pub fn new(default_state: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
            default_state: Arc::new(default_state),
        }
    }

    /// Creates a store pre-populated with `initial_state`.
    pub fn with_initial_state(
        default_state: impl Fn() -> T + Send + Sync + 'static,
        initial_state: HashMap<String, T>,
    ) -> Self {
        Self {
            state: RwLock::new(initial_state),
            default_state: Arc::new(default_state),
        }
    }
}

#[async_trait]
impl<T> StateStore<T> for LocalStateStore<T>
where
    T: Clone + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<T, GraphError> {
        let state = self.state.read().await;
        Ok(state
            .get(key)
            .cloned()
            .unwrap_or_else(|| (self.default_state)()))
    }

    async fn set(&self, key: &str, value: T) -> Result<(), GraphError> {
        let mut state = self.state.write().await;
        state.insert(key.to_string(), value);
        Ok(())
    }
}
