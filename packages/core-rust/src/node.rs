//! Field nodes: one editable row of the schema tree.
//!
//! A [`FieldNode`] exclusively owns its children by value. There are no parent
//! back-references; every operation addresses a node by its [`NodeId`].
//!
//! # Identity
//!
//! Identities come from a process-wide monotonic counter, so they are unique
//! across every tree in the process and never reused after a node is dropped.
//! They locate nodes for mutation and never appear in serialized output.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::field_type::NESTED_TYPE_ID;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a [`FieldNode`], stable for the node's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value, for logging and display only.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single field change requested by the editing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Rename the field. An empty name is allowed while editing.
    Name(String),
    /// Pick (or unset) the field type. Anything other than `nested` clears
    /// the node's children.
    Type(Option<String>),
    /// Toggle the required flag.
    Required(bool),
}

/// One field definition, possibly holding nested fields.
///
/// `children` is non-empty only while `type_id` is `nested`. The fields are
/// private so every change goes through [`FieldNode::apply`], which keeps that
/// invariant in a single step.
///
/// Not `Clone`: two nodes can never share an identity. Use
/// [`FieldNode::duplicate`] to copy a subtree under fresh identities.
#[derive(Debug, PartialEq)]
pub struct FieldNode {
    id: NodeId,
    name: String,
    type_id: Option<String>,
    required: bool,
    children: Vec<FieldNode>,
}

impl FieldNode {
    /// Creates an empty row with a fresh identity: no name, no type,
    /// not required, no children.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            name: String::new(),
            type_id: None,
            required: false,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn type_id(&self) -> Option<&str> {
        self.type_id.as_deref()
    }

    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    /// Whether this node currently has the `nested` type.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.type_id.as_deref() == Some(NESTED_TYPE_ID)
    }

    /// Mutable access to the child sequence, only while the node is nested.
    ///
    /// Returns `None` for every other type, so children can never be attached
    /// to a node that would not serialize them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<FieldNode>> {
        if self.is_nested() {
            Some(&mut self.children)
        } else {
            None
        }
    }

    /// Applies one field change, including derived changes.
    ///
    /// Switching the type to anything other than `nested` (including unsetting
    /// it) drops the whole child subtree within the same call.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => self.name = name,
            FieldUpdate::Required(required) => self.required = required,
            FieldUpdate::Type(type_id) => {
                if type_id.as_deref() != Some(NESTED_TYPE_ID) {
                    self.children.clear();
                }
                self.type_id = type_id;
            }
        }
    }

    /// Deep copy of this node and its subtree, every copy under a freshly
    /// minted identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: NodeId::next(),
            name: self.name.clone(),
            type_id: self.type_id.clone(),
            required: self.required,
            children: self.children.iter().map(FieldNode::duplicate).collect(),
        }
    }

    /// Builder form of [`FieldUpdate::Name`].
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.apply(FieldUpdate::Name(name.into()));
        self
    }

    /// Builder form of [`FieldUpdate::Type`].
    #[must_use]
    pub fn typed(mut self, type_id: impl Into<String>) -> Self {
        self.apply(FieldUpdate::Type(Some(type_id.into())));
        self
    }

    /// Builder form of [`FieldUpdate::Required`].
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.apply(FieldUpdate::Required(required));
        self
    }
}

impl Default for FieldNode {
    fn default() -> Self {
        Self::new()
    }
}
