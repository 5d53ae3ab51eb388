//! Schema Builder Core — field-type registry, recursive schema tree, and the
//! JSON serializer that renders the tree as a document.

pub mod error;
pub mod field_type;
pub mod node;
pub mod serialize;
pub mod tree;

pub use error::{Result, SchemaError};
pub use field_type::{list_types, lookup, FieldType, Representation, NESTED_TYPE_ID};
pub use node::{FieldNode, FieldUpdate, NodeId};
pub use serialize::serialize;
pub use tree::{create_node, insert, push, remove, update_field, DepthFirst, SchemaTree};
