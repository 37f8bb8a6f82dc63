//! Tools: schema derivation, specs, and dispatch of model-requested calls.
//!
//! A tool is a host-supplied callable the model invokes through `toolUse`
//! content blocks. This module covers the whole round trip:
//!
//! - [`ToolParam`] and [`ToolSpec::builder`] derive a JSON Schema from a
//!   tool's typed parameters.
//! - [`Tool`] is the callable contract; [`FunctionTool`] adapts closures.
//! - [`maybe_execute_tools`] runs every `toolUse` block in an assistant
//!   message and materializes the results as a user-role message.
//!
//! Tool failures never abort a layer: they come back to the model as
//! error-status `toolResult` blocks.

mod dispatch;
mod function;
mod schema;
mod spec;

pub use dispatch::{maybe_execute_tools, tool_result_content};
pub use function::{FunctionTool, Tool, ToolError, ToolFn};
pub use schema::{is_optional, object_schema, OneOf, ToolParam};
pub use spec::{ToolSpec, ToolSpecBuilder};
