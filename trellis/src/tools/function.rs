//! The tool contract and a closure adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::tools::ToolSpec;

/// Tool invocation failure.
///
/// Never propagates out of dispatch: the dispatcher stringifies it into an
/// error-status `toolResult` block for the model to react to.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The input object did not match the tool's parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tool itself failed.
    #[error("{0}")]
    Failed(String),
}

/// A host-supplied callable the model can invoke.
///
/// `call` receives the `toolUse` input object and returns a JSON value; the
/// dispatcher encodes the value into result content by its kind (string →
/// text, number → stringified text, object → json, array → json items).
///
/// **Interaction**: registered on the chatbot context; specs are attached
/// to converse requests so the model can choose to call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, matched against `toolUse.name` at dispatch.
    fn name(&self) -> &str;

    /// The spec advertised to the model.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with the given input object.
    async fn call(&self, input: Value) -> Result<Value, ToolError>;
}

/// Body of a [`FunctionTool`]: `input object -> result value`.
pub type ToolFn = Arc<dyn Fn(Value) -> Result<Value, ToolError> + Send + Sync>;

/// Adapts a plain closure plus a derived [`ToolSpec`] into a [`Tool`].
///
/// The closure is synchronous; tools that await implement [`Tool`]
/// directly. Typed tools deserialize their input inside the closure:
///
/// ```rust
/// use serde_json::{json, Value};
/// use trellis::tools::{FunctionTool, ToolError, ToolSpec};
///
/// let get_temperature = FunctionTool::new(
///     ToolSpec::builder("get_temperature", "Returns the current temperature for a city.")
///         .param::<String>("city")
///         .build(),
///     |input: Value| {
///         let _city = input["city"]
///             .as_str()
///             .ok_or_else(|| ToolError::InvalidInput("city must be a string".to_string()))?;
///         Ok(json!(50))
///     },
/// );
/// ```
pub struct FunctionTool {
    spec: ToolSpec,
    func: ToolFn,
}

impl FunctionTool {
    /// Creates a tool from a spec and a closure.
    pub fn new(
        spec: ToolSpec,
        func: impl Fn(Value) -> Result<Value, ToolError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            spec,
            func: Arc::new(func),
        }
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        (self.func)(input)
    }
}
