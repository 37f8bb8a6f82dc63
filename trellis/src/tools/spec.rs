//! Tool specifications: name, description, and derived input schema.

use serde_json::{json, Value};

use crate::tools::schema::{is_optional, ToolParam};

/// Specification of one tool, as advertised to the model.
///
/// `input_schema` is a JSON Schema object; [`ToolSpec::to_wire`] wraps it in
/// the converse tool-spec shape
/// (`{name, description, inputSchema: {json: …}}`).
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolSpec {
    /// Creates a spec from an already-built schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Starts deriving a spec from typed parameters.
    ///
    /// The description plays the docstring's role: it is what the model
    /// reads to decide when to call the tool.
    pub fn builder(name: impl Into<String>, description: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// The wire form sent inside a tool config.
    pub fn to_wire(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": {"json": self.input_schema},
        })
    }
}

/// Derives a tool's input schema one typed parameter at a time.
///
/// A parameter is required unless its type admits null (`Option<T>`, or a
/// union containing the null arm). Parameter order is preserved in
/// `required`.
pub struct ToolSpecBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, Value>,
    required: Vec<Value>,
}

impl ToolSpecBuilder {
    /// Declares a parameter of type `T`.
    pub fn param<T: ToolParam>(mut self, name: &str) -> Self {
        let schema = T::json_schema();
        if !is_optional(&schema) {
            self.required.push(json!(name));
        }
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Finishes the derivation.
    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            description: self.description,
            input_schema: json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::{object_schema, OneOf, ToolParam};

    /// **Scenario**: two numeric parameters derive number/number, both required.
    #[test]
    fn simple_tool_spec() {
        let spec = ToolSpec::builder("sum", "Sums two numbers and returns their result")
            .param::<i64>("a")
            .param::<i64>("b")
            .build();

        assert_eq!(spec.name, "sum");
        assert_eq!(spec.description, "Sums two numbers and returns their result");
        assert_eq!(
            spec.input_schema,
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number"},
                    "b": {"type": "number"},
                },
                "required": ["a", "b"],
            })
        );
    }

    /// **Scenario**: an Option parameter becomes ["number","null"] and drops out of required.
    #[test]
    fn tool_spec_with_optional_param() {
        let spec = ToolSpec::builder("sum", "Sums two numbers and returns their result")
            .param::<i64>("a")
            .param::<Option<i64>>("b")
            .build();

        assert_eq!(
            spec.input_schema,
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number"},
                    "b": {"type": ["number", "null"]},
                },
                "required": ["a"],
            })
        );
    }

    struct Vector2;

    impl ToolParam for Vector2 {
        fn json_schema() -> Value {
            object_schema(&[("a", i64::json_schema()), ("b", i64::json_schema())])
        }
    }

    /// **Scenario**: record parameters recurse into a nested object schema with its own required.
    #[test]
    fn tool_spec_with_record_params() {
        let spec = ToolSpec::builder("sum", "Sums two Vector2s and returns the result as a Vector2")
            .param::<Vector2>("one")
            .param::<Vector2>("two")
            .build();

        let vector2_schema = json!({
            "type": "object",
            "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
            "required": ["a", "b"],
        });
        assert_eq!(
            spec.input_schema,
            json!({
                "type": "object",
                "properties": {"one": vector2_schema, "two": vector2_schema},
                "required": ["one", "two"],
            })
        );
    }

    struct Num;

    impl ToolParam for Num {
        fn json_schema() -> Value {
            object_schema(&[("n", i64::json_schema())])
        }
    }

    /// **Scenario**: union parameters place each arm in the type array; records
    /// contribute their full schema, primitives their name.
    #[test]
    fn tool_spec_with_union_params() {
        let spec = ToolSpec::builder("sum", "Sums two numbers and returns the result")
            .param::<OneOf<Num, i64>>("one")
            .param::<OneOf<Num, i64>>("two")
            .build();

        let num_schema = json!({
            "type": "object",
            "properties": {"n": {"type": "number"}},
            "required": ["n"],
        });
        assert_eq!(
            spec.input_schema,
            json!({
                "type": "object",
                "properties": {
                    "one": {"type": [num_schema, "number"]},
                    "two": {"type": [num_schema, "number"]},
                },
                "required": ["one", "two"],
            })
        );
    }

    /// **Scenario**: the wire form nests the schema under inputSchema.json.
    #[test]
    fn wire_form() {
        let spec = ToolSpec::builder("noop", "Does nothing").build();
        assert_eq!(
            spec.to_wire(),
            json!({
                "name": "noop",
                "description": "Does nothing",
                "inputSchema": {"json": {
                    "type": "object",
                    "properties": {},
                    "required": [],
                }},
            })
        );
    }
}
