//! Free-form and structured generation over any backend.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::GraphError;
use crate::llm::{
    ConverseRequest, ConverseResponse, InferenceConfig, ModelBackend, ToolChoiceMode, ToolConfig,
};
use crate::message::Message;
use crate::tools::{Tool, ToolSpec};

/// Name of the synthetic tool used for structured output.
pub const STRUCTURED_OUTPUT_TOOL: &str = "json_schema";

/// Free-form generation: system prompt + conversation, optional tools.
///
/// When tools are given, their specs are attached with
/// [`ToolChoiceMode::Auto`] so the model may answer in text or request
/// invocations.
pub async fn converse(
    backend: &dyn ModelBackend,
    model_id: &str,
    prompt: &str,
    messages: &[Message],
    config: InferenceConfig,
    tools: Option<&[Arc<dyn Tool>]>,
) -> Result<ConverseResponse, GraphError> {
    let mut request = ConverseRequest::new(model_id, messages.to_vec())
        .with_system(prompt)
        .with_inference(config);

    if let Some(tools) = tools {
        if !tools.is_empty() {
            request = request.with_tool_config(ToolConfig {
                tools: tools.iter().map(|tool| tool.spec()).collect(),
                tool_choice: ToolChoiceMode::Auto,
            });
        }
    }

    backend.converse(&request).await
}

/// Structured generation: constrain the response to a target type.
///
/// Synthesizes a single tool named [`STRUCTURED_OUTPUT_TOOL`] whose input
/// schema is `T`'s JSON Schema, forces the model to call it, and
/// deserializes the call's input into `T`. Works on every backend with
/// tool use, whether or not the provider supports schema-constrained
/// completion natively. A missing tool call or non-validating input is a
/// [`GraphError::SchemaViolation`].
pub async fn converse_with_structured_output<T>(
    backend: &dyn ModelBackend,
    model_id: &str,
    messages: &[Message],
    prompt: &str,
    config: InferenceConfig,
) -> Result<T, GraphError>
where
    T: DeserializeOwned + schemars::JsonSchema,
{
    let schema = serde_json::to_value(schemars::schema_for!(T))
        .map_err(|err| GraphError::SchemaViolation(err.to_string()))?;

    let request = ConverseRequest::new(model_id, messages.to_vec())
        .with_system(prompt)
        .with_inference(config)
        .with_tool_config(ToolConfig {
            tools: vec![ToolSpec::new(
                STRUCTURED_OUTPUT_TOOL,
                "Represents the JSON schema for the desired output format.",
                schema,
            )],
            tool_choice: ToolChoiceMode::Tool(STRUCTURED_OUTPUT_TOOL.to_string()),
        });

    let response = backend.converse(&request).await?;
    let tool_use = response
        .message
        .tool_uses()
        .into_iter()
        .next()
        .ok_or_else(|| {
            GraphError::SchemaViolation("response contained no toolUse block".to_string())
        })?;

    serde_json::from_value(tool_use.input.clone())
        .map_err(|err| GraphError::SchemaViolation(err.to_string()))
}
