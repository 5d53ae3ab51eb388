//! Field-type registry.
//!
//! A fixed, ordered catalog of the field kinds a schema row can declare. The
//! order is the display order of the type picker. Each entry carries the
//! placeholder the serializer emits for the field, which depends on whether
//! the field is marked required:
//!
//! | id | label | optional | required |
//! |---|---|---|---|
//! | `string` | String | `"string"` | `"STRING"` |
//! | `number` | Number | `"number"` | `0` |
//! | `nested` | Nested | child object | child object |
//! | `objectId` | ObjectId | `"objectId"` | `"OBJECTID"` |
//! | `float` | Float | `"float"` | `0.0` |
//! | `boolean` | Boolean | `"boolean"` | `true` |
//!
//! The placeholders are typed sentinels, not sample data. Downstream consumers
//! of the generated document rely on these exact values.

use serde::Serialize;
use serde_json::Value;

/// Identifier of the only field type that may own child fields.
pub const NESTED_TYPE_ID: &str = "nested";

/// How a field of a given type appears in the serialized document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Representation {
    /// A string placeholder.
    Text(&'static str),
    /// An integer placeholder.
    Integer(i64),
    /// A floating-point placeholder. Always rendered with a fractional part,
    /// so the required float sentinel is `0.0`, not `0`. As a `serde_json`
    /// value it compares unequal to the integer `0` emitted for required
    /// `number` fields; compare via `Value::as_f64` to treat them alike.
    Float(f64),
    /// A boolean placeholder.
    Bool(bool),
    /// The field's value is the serialized object of its children.
    Nested,
}

impl Representation {
    /// Returns the JSON value of a leaf representation, or `None` for
    /// [`Representation::Nested`], whose value depends on the node's children.
    #[must_use]
    pub fn leaf_value(self) -> Option<Value> {
        match self {
            Self::Text(text) => Some(Value::String(text.to_string())),
            Self::Integer(n) => Some(Value::from(n)),
            Self::Float(f) => Some(Value::from(f)),
            Self::Bool(b) => Some(Value::Bool(b)),
            Self::Nested => None,
        }
    }
}

/// A registry entry: one selectable field kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldType {
    /// Stable identifier stored on schema rows.
    pub id: &'static str,
    /// Human-readable label for the type picker.
    pub label: &'static str,
    /// Placeholder emitted when the field is not required.
    #[serde(skip)]
    pub optional: Representation,
    /// Placeholder emitted when the field is required.
    #[serde(skip)]
    pub required: Representation,
}

impl FieldType {
    /// Picks the representation for a field with the given required flag.
    #[must_use]
    pub fn representation(&self, required: bool) -> Representation {
        if required {
            self.required
        } else {
            self.optional
        }
    }

    /// Whether rows of this type own child fields.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.id == NESTED_TYPE_ID
    }
}

static FIELD_TYPES: [FieldType; 6] = [
    FieldType {
        id: "string",
        label: "String",
        optional: Representation::Text("string"),
        required: Representation::Text("STRING"),
    },
    FieldType {
        id: "number",
        label: "Number",
        optional: Representation::Text("number"),
        required: Representation::Integer(0),
    },
    FieldType {
        id: NESTED_TYPE_ID,
        label: "Nested",
        optional: Representation::Nested,
        required: Representation::Nested,
    },
    FieldType {
        id: "objectId",
        label: "ObjectId",
        optional: Representation::Text("objectId"),
        required: Representation::Text("OBJECTID"),
    },
    FieldType {
        id: "float",
        label: "Float",
        optional: Representation::Text("float"),
        required: Representation::Float(0.0),
    },
    FieldType {
        id: "boolean",
        label: "Boolean",
        optional: Representation::Text("boolean"),
        required: Representation::Bool(true),
    },
];

/// Returns the full catalog in display order.
#[must_use]
pub fn list_types() -> &'static [FieldType] {
    &FIELD_TYPES
}

/// Looks up a field type by its identifier.
///
/// # Examples
///
/// ```
/// use schema_builder_core::field_type::lookup;
///
/// assert_eq!(lookup("objectId").map(|t| t.label), Some("ObjectId"));
/// assert!(lookup("date").is_none());
/// ```
#[must_use]
pub fn lookup(id: &str) -> Option<&'static FieldType> {
    FIELD_TYPES.iter().find(|field_type| field_type.id == id)
}
