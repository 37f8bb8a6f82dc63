//! Dispatch of model-requested tool invocations.
//!
//! Scans an assistant message for `toolUse` blocks, runs each against the
//! registered tools, and collects the encoded results into one user-role
//! message, the shape the model expects the next converse call to carry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::message::{
    ContentBlock, Message, Role, ToolResultBlock, ToolResultContent, ToolResultStatus, ToolUseBlock,
};
use crate::tools::Tool;

/// Executes every `toolUse` block in `message`, in order.
///
/// Returns a user-role message holding one `toolResult` block per use, or
/// `None` when the message has no `toolUse` blocks. Unknown tool names and
/// tool failures become error-status results; they never raise.
pub async fn maybe_execute_tools(
    message: &Message,
    tools: &[Arc<dyn Tool>],
) -> Option<Message> {
    let uses = message.tool_uses();
    if uses.is_empty() {
        return None;
    }

    let by_name: HashMap<&str, &Arc<dyn Tool>> =
        tools.iter().map(|tool| (tool.name(), tool)).collect();

    let mut content = Vec::with_capacity(uses.len());
    for tool_use in uses {
        content.push(ContentBlock::ToolResult(
            execute_tool(tool_use, &by_name).await,
        ));
    }

    Some(Message {
        role: Role::User,
        content,
    })
}

async fn execute_tool(
    tool_use: &ToolUseBlock,
    by_name: &HashMap<&str, &Arc<dyn Tool>>,
) -> ToolResultBlock {
    let Some(tool) = by_name.get(tool_use.name.as_str()) else {
        return ToolResultBlock {
            tool_use_id: tool_use.tool_use_id.clone(),
            status: ToolResultStatus::Error,
            content: vec![ToolResultContent::Text(format!(
                "unknown tool: {}",
                tool_use.name
            ))],
        };
    };

    match tool.call(tool_use.input.clone()).await {
        Ok(value) => ToolResultBlock {
            tool_use_id: tool_use.tool_use_id.clone(),
            status: ToolResultStatus::Success,
            content: vec![tool_result_content(&value)],
        },
        Err(err) => ToolResultBlock {
            tool_use_id: tool_use.tool_use_id.clone(),
            status: ToolResultStatus::Error,
            content: vec![ToolResultContent::Text(err.to_string())],
        },
    }
}

/// Encodes a tool's return value into result content by its kind.
///
/// Strings and numbers become text; objects pass through as json; arrays
/// become `{"items": [stringified elements]}`.
pub fn tool_result_content(value: &Value) -> ToolResultContent {
    match value {
        Value::String(text) => ToolResultContent::Text(text.clone()),
        Value::Number(number) => ToolResultContent::Text(number.to_string()),
        Value::Bool(flag) => ToolResultContent::Text(flag.to_string()),
        Value::Null => ToolResultContent::Text("null".to_string()),
        Value::Object(_) => ToolResultContent::Json(value.clone()),
        Value::Array(items) => ToolResultContent::Json(json!({
            "items": items.iter().map(stringify).collect::<Vec<String>>(),
        })),
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FunctionTool, ToolError, ToolSpec};

    fn get_temperature() -> Arc<dyn Tool> {
        Arc::new(FunctionTool::new(
            ToolSpec::builder("get_temperature", "Returns the current temperature for a city.")
                .param::<String>("city")
                .build(),
            |_input| Ok(json!(50)),
        ))
    }

    fn get_wind() -> Arc<dyn Tool> {
        Arc::new(FunctionTool::new(
            ToolSpec::builder("get_wind", "Returns the current wind speed for a city.")
                .param::<String>("city")
                .build(),
            |_input| Ok(json!(10)),
        ))
    }

    fn tool_use_message(blocks: Vec<(&str, &str, Value)>) -> Message {
        Message {
            role: Role::Assistant,
            content: blocks
                .into_iter()
                .map(|(name, id, input)| {
                    ContentBlock::ToolUse(ToolUseBlock {
                        tool_use_id: id.to_string(),
                        name: name.to_string(),
                        input,
                    })
                })
                .collect(),
        }
    }

    /// **Scenario**: a single tool call yields one success result in a user message.
    #[tokio::test]
    async fn executes_single_tool() {
        let message = tool_use_message(vec![(
            "get_temperature",
            "use-1",
            json!({"city": "San Francisco"}),
        )]);

        let result = maybe_execute_tools(&message, &[get_temperature()])
            .await
            .expect("tool results");

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "role": "user",
                "content": [{"toolResult": {
                    "toolUseId": "use-1",
                    "status": "success",
                    "content": [{"text": "50"}],
                }}],
            })
        );
    }

    /// **Scenario**: multiple tool calls yield results in the same order as the uses.
    #[tokio::test]
    async fn executes_multiple_tools() {
        let message = tool_use_message(vec![
            ("get_temperature", "use-1", json!({"city": "San Francisco"})),
            ("get_wind", "use-2", json!({"city": "San Francisco"})),
        ]);

        let result = maybe_execute_tools(&message, &[get_temperature(), get_wind()])
            .await
            .expect("tool results");

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "role": "user",
                "content": [
                    {"toolResult": {
                        "toolUseId": "use-1",
                        "status": "success",
                        "content": [{"text": "50"}],
                    }},
                    {"toolResult": {
                        "toolUseId": "use-2",
                        "status": "success",
                        "content": [{"text": "10"}],
                    }},
                ],
            })
        );
    }

    /// **Scenario**: an object return is encoded as a json result block.
    #[tokio::test]
    async fn executes_tool_that_returns_object() {
        let get_weather: Arc<dyn Tool> = Arc::new(FunctionTool::new(
            ToolSpec::builder("get_weather", "Returns current weather details for a city.")
                .param::<String>("city")
                .build(),
            |_input| Ok(json!({"temperature": 50, "wind": 10, "rain": 0})),
        ));

        let message = tool_use_message(vec![(
            "get_weather",
            "use-1",
            json!({"city": "San Francisco"}),
        )]);
        let result = maybe_execute_tools(&message, &[get_weather])
            .await
            .expect("tool results");

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "role": "user",
                "content": [{"toolResult": {
                    "toolUseId": "use-1",
                    "status": "success",
                    "content": [{"json": {"temperature": 50, "wind": 10, "rain": 0}}],
                }}],
            })
        );
    }

    /// **Scenario**: an array return becomes {"items": [stringified elements]}.
    #[test]
    fn array_return_is_encoded_as_items() {
        let content = tool_result_content(&json!(["a", 1, true]));
        assert_eq!(
            content,
            ToolResultContent::Json(json!({"items": ["a", "1", "true"]}))
        );
    }

    /// **Scenario**: a message without toolUse blocks dispatches to None.
    #[tokio::test]
    async fn does_nothing_without_tool_use_blocks() {
        let message = Message::assistant("Hi");
        let result = maybe_execute_tools(&message, &[get_temperature()]).await;
        assert!(result.is_none());
    }

    /// **Scenario**: an unknown tool name produces an error-status result, not a failure.
    #[tokio::test]
    async fn unknown_tool_produces_error_result() {
        let message = tool_use_message(vec![("get_humidity", "use-1", json!({}))]);
        let result = maybe_execute_tools(&message, &[get_temperature()])
            .await
            .expect("tool results");

        let ContentBlock::ToolResult(block) = &result.content[0] else {
            panic!("expected toolResult block");
        };
        assert_eq!(block.status, ToolResultStatus::Error);
        assert_eq!(
            block.content,
            vec![ToolResultContent::Text("unknown tool: get_humidity".to_string())]
        );
    }

    /// **Scenario**: a failing tool produces an error-status result with the message.
    #[tokio::test]
    async fn failing_tool_produces_error_result() {
        let flaky: Arc<dyn Tool> = Arc::new(FunctionTool::new(
            ToolSpec::builder("flaky", "Always fails.").build(),
            |_input| Err(ToolError::Failed("city not found".to_string())),
        ));

        let message = tool_use_message(vec![("flaky", "use-1", json!({}))]);
        let result = maybe_execute_tools(&message, &[flaky])
            .await
            .expect("tool results");

        let ContentBlock::ToolResult(block) = &result.content[0] else {
            panic!("expected toolResult block");
        };
        assert_eq!(block.status, ToolResultStatus::Error);
        assert_eq!(
            block.content,
            vec![ToolResultContent::Text("city not found".to_string())]
        );
    }
}
