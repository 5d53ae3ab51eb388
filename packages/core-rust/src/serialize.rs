//! Schema tree to JSON serializer.
//!
//! Pure and deterministic. Rows that are still being filled in (empty name or
//! no type) contribute nothing, as do rows whose type is not in the registry.
//! Duplicate sibling names resolve last-write-wins: the value comes from the
//! last sibling, the key keeps the position of the first.

use serde_json::{Map, Value};
use tracing::trace;

use crate::field_type::{lookup, Representation};
use crate::node::FieldNode;

/// Serializes a sibling sequence into a JSON object, recursing into nested
/// rows.
///
/// # Examples
///
/// ```
/// use schema_builder_core::{serialize, FieldNode};
/// use serde_json::json;
///
/// let rows = vec![FieldNode::new().named("age").typed("number")];
/// assert_eq!(serde_json::Value::Object(serialize(&rows)), json!({ "age": "number" }));
/// ```
#[must_use]
pub fn serialize(nodes: &[FieldNode]) -> Map<String, Value> {
    let mut output = Map::new();
    for node in nodes {
        if let Some(value) = serialize_node(node) {
            output.insert(node.name().to_string(), value);
        }
    }
    output
}

fn serialize_node(node: &FieldNode) -> Option<Value> {
    let Some(type_id) = node.type_id() else {
        trace!(node = %node.id(), "skip field without type");
        return None;
    };
    if node.name().is_empty() {
        trace!(node = %node.id(), "skip field without name");
        return None;
    }
    let Some(field_type) = lookup(type_id) else {
        trace!(node = %node.id(), type_id, "skip field with unknown type");
        return None;
    };

    match field_type.representation(node.required()) {
        Representation::Nested => Some(Value::Object(serialize(node.children()))),
        leaf => leaf.leaf_value(),
    }
}
