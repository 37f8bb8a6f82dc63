//! JSON Schema derivation from parameter types.
//!
//! [`ToolParam`] is the reflection seam: each parameter type knows its own
//! schema fragment, and [`ToolSpec::builder`](super::ToolSpec::builder)
//! assembles fragments into the tool's input schema. Integers and floats
//! both map to `"number"` for wire compatibility with the converse tool
//! format.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A type usable as a tool parameter.
///
/// `json_schema` produces the full schema fragment for the type;
/// `union_arm` produces the value placed inside a union's `type` array:
/// the primitive type name for scalars and containers, or the full object
/// schema for record types (the default).
///
/// Record types implement this directly, building their schema with
/// [`object_schema`]; nesting recurses naturally through the field types.
pub trait ToolParam {
    /// Full JSON Schema fragment, e.g. `{"type": "number"}`.
    fn json_schema() -> Value;

    /// This type's entry in a union's `type` array.
    fn union_arm() -> Value {
        Self::json_schema()
    }
}

macro_rules! primitive_param {
    ($name:literal => $($t:ty),+) => {
        $(impl ToolParam for $t {
            fn json_schema() -> Value {
                json!({"type": $name})
            }
            fn union_arm() -> Value {
                json!($name)
            }
        })+
    };
}

primitive_param!("number" => i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
primitive_param!("string" => String, &str);
primitive_param!("boolean" => bool);
primitive_param!("null" => ());

impl<T: ToolParam> ToolParam for Vec<T> {
    fn json_schema() -> Value {
        json!({"type": "array", "items": T::json_schema()})
    }

    fn union_arm() -> Value {
        json!("array")
    }
}

impl<V> ToolParam for std::collections::HashMap<String, V> {
    /// Open-ended mapping; value types are not constrained.
    fn json_schema() -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn union_arm() -> Value {
        json!("object")
    }
}

impl<T: ToolParam> ToolParam for Option<T> {
    /// A union with the null variant; the parameter becomes optional.
    fn json_schema() -> Value {
        json!({"type": [T::union_arm(), "null"]})
    }
}

/// A two-armed union parameter, e.g. `OneOf<Num, i64>` for "a `Num` or a
/// plain number". Deserializes untagged: the first matching arm wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOf<A, B> {
    First(A),
    Second(B),
}

impl<A: ToolParam, B: ToolParam> ToolParam for OneOf<A, B> {
    fn json_schema() -> Value {
        json!({"type": [A::union_arm(), B::union_arm()]})
    }
}

/// True when a schema fragment admits null, making its parameter optional.
pub fn is_optional(schema: &Value) -> bool {
    match schema.get("type") {
        Some(Value::Array(arms)) => arms.iter().any(|arm| arm == "null"),
        Some(Value::String(name)) => name == "null",
        _ => true,
    }
}

/// Assembles an object schema from named field fragments, computing
/// `required` from which fields admit null.
///
/// The building block for record-type [`ToolParam`] impls and for
/// [`ToolSpecBuilder`](super::ToolSpecBuilder).
pub fn object_schema(fields: &[(&str, Value)]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required: Vec<Value> = Vec::new();
    for (name, schema) in fields {
        if !is_optional(schema) {
            required.push(json!(name));
        }
        properties.insert((*name).to_string(), schema.clone());
    }
    json!({"type": "object", "properties": properties, "required": required})
}
