//! The schema tree and its mutation operations.
//!
//! Two layers of API are provided:
//!
//! - Free functions ([`insert`], [`push`], [`remove`], [`update_field`]) that
//!   operate on one sibling sequence: the root sequence or some nested node's
//!   children.
//! - [`SchemaTree`], which owns the root sequence and addresses nodes by
//!   [`NodeId`] at any depth.
//!
//! Removing or updating an identity that is not present is a no-op. An insert
//! index outside `[0, len]` is a usage error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::node::{FieldNode, FieldUpdate, NodeId};
use crate::serialize::serialize;

// ---------------------------------------------------------------------------
// Sequence operations
// ---------------------------------------------------------------------------

/// Creates an empty row with a fresh identity.
#[must_use]
pub fn create_node() -> FieldNode {
    FieldNode::new()
}

/// Inserts `node` into `sequence` at `index`.
///
/// # Errors
///
/// Returns [`SchemaError::IndexOutOfBounds`] if `index > sequence.len()`.
pub fn insert(sequence: &mut Vec<FieldNode>, index: usize, node: FieldNode) -> Result<()> {
    if index > sequence.len() {
        return Err(SchemaError::IndexOutOfBounds {
            index,
            len: sequence.len(),
        });
    }
    debug!(node = %node.id(), index, "insert field");
    sequence.insert(index, node);
    Ok(())
}

/// Appends `node` to the end of `sequence`, returning its identity.
pub fn push(sequence: &mut Vec<FieldNode>, node: FieldNode) -> NodeId {
    let id = node.id();
    debug!(node = %id, index = sequence.len(), "append field");
    sequence.push(node);
    id
}

/// Detaches the node with identity `id` from `sequence`, together with its
/// subtree. Returns `None` if no sibling in `sequence` has that identity.
pub fn remove(sequence: &mut Vec<FieldNode>, id: NodeId) -> Option<FieldNode> {
    let position = sequence.iter().position(|node| node.id() == id)?;
    debug!(node = %id, "remove field");
    Some(sequence.remove(position))
}

/// Applies `update` to the sibling in `sequence` with identity `id`.
///
/// Returns `false` (and changes nothing) if no such sibling exists.
pub fn update_field(sequence: &mut [FieldNode], id: NodeId, update: FieldUpdate) -> bool {
    match sequence.iter_mut().find(|node| node.id() == id) {
        Some(node) => {
            debug!(node = %id, ?update, "update field");
            node.apply(update);
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Recursive lookup helpers
// ---------------------------------------------------------------------------

fn find_in(nodes: &[FieldNode], id: NodeId) -> Option<&FieldNode> {
    nodes.iter().find_map(|node| {
        if node.id() == id {
            Some(node)
        } else {
            find_in(node.children(), id)
        }
    })
}

fn find_in_mut(nodes: &mut [FieldNode], id: NodeId) -> Option<&mut FieldNode> {
    nodes.iter_mut().find_map(|node| {
        if node.id() == id {
            Some(node)
        } else {
            node.children_mut()
                .and_then(|children| find_in_mut(children, id))
        }
    })
}

fn remove_in(nodes: &mut Vec<FieldNode>, id: NodeId) -> Option<FieldNode> {
    if let Some(position) = nodes.iter().position(|node| node.id() == id) {
        return Some(nodes.remove(position));
    }
    nodes.iter_mut().find_map(|node| {
        node.children_mut()
            .and_then(|children| remove_in(children, id))
    })
}

// ---------------------------------------------------------------------------
// DepthFirst
// ---------------------------------------------------------------------------

/// Pre-order iterator over every node of a forest.
pub struct DepthFirst<'a> {
    stack: Vec<std::slice::Iter<'a, FieldNode>>,
}

impl<'a> DepthFirst<'a> {
    /// Iterates `nodes` and all of their descendants.
    #[must_use]
    pub fn new(nodes: &'a [FieldNode]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a FieldNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            if let Some(node) = top.next() {
                self.stack.push(node.children().iter());
                return Some(node);
            }
            self.stack.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaTree
// ---------------------------------------------------------------------------

/// The schema being edited: an ordered forest of [`FieldNode`]s.
///
/// Root order is the display order and the key order of the serialized
/// object.
///
/// # Examples
///
/// ```
/// use schema_builder_core::{FieldUpdate, SchemaTree};
/// use serde_json::json;
///
/// let mut tree = SchemaTree::new();
/// let id = tree.append(None).unwrap();
/// tree.update(id, FieldUpdate::Name("age".to_string()));
/// tree.update(id, FieldUpdate::Type(Some("number".to_string())));
/// tree.update(id, FieldUpdate::Required(true));
///
/// assert_eq!(serde_json::Value::Object(tree.serialize()), json!({ "age": 0 }));
/// ```
#[derive(Debug, Default, PartialEq)]
pub struct SchemaTree {
    roots: Vec<FieldNode>,
}

impl SchemaTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// The root sequence.
    #[must_use]
    pub fn roots(&self) -> &[FieldNode] {
        &self.roots
    }

    /// Number of root rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes at all depths.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.iter_depth_first().count()
    }

    /// Pre-order traversal of every node in the tree.
    #[must_use]
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::new(&self.roots)
    }

    /// Whether a node with this identity is reachable from the roots.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Finds a node at any depth.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&FieldNode> {
        find_in(&self.roots, id)
    }

    /// Finds a node at any depth, mutably.
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut FieldNode> {
        find_in_mut(&mut self.roots, id)
    }

    /// Resolves the sibling sequence owned by `parent`, or the root sequence
    /// when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownNode`] if `parent` is not in the tree and
    /// [`SchemaError::NotNested`] if it exists but is not of the nested type.
    pub fn sequence_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Vec<FieldNode>> {
        let Some(parent) = parent else {
            return Ok(&mut self.roots);
        };
        let node = self
            .find_mut(parent)
            .ok_or(SchemaError::UnknownNode(parent))?;
        node.children_mut().ok_or(SchemaError::NotNested(parent))
    }

    /// Inserts `node` under `parent` (or at the root) at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the parent cannot hold children or if the index is out of
    /// range.
    pub fn insert_at(
        &mut self,
        parent: Option<NodeId>,
        index: usize,
        node: FieldNode,
    ) -> Result<NodeId> {
        let id = node.id();
        insert(self.sequence_mut(parent)?, index, node)?;
        Ok(id)
    }

    /// Appends a freshly created empty row under `parent` (or at the root).
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or not nested.
    pub fn append(&mut self, parent: Option<NodeId>) -> Result<NodeId> {
        Ok(push(self.sequence_mut(parent)?, create_node()))
    }

    /// Removes a node at any depth and returns its detached subtree.
    /// Unknown identities are a no-op.
    pub fn remove(&mut self, id: NodeId) -> Option<FieldNode> {
        let removed = remove_in(&mut self.roots, id);
        if let Some(node) = &removed {
            debug!(
                node = %id,
                subtree = DepthFirst::new(std::slice::from_ref(node)).count(),
                "remove field subtree"
            );
        }
        removed
    }

    /// Applies a field change to a node at any depth. Returns `false` if the
    /// identity is not in the tree.
    pub fn update(&mut self, id: NodeId, update: FieldUpdate) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                debug!(node = %id, ?update, "update field");
                node.apply(update);
                true
            }
            None => false,
        }
    }

    /// Serializes the tree into its JSON object form.
    #[must_use]
    pub fn serialize(&self) -> Map<String, Value> {
        serialize(&self.roots)
    }

    /// Serializes the tree as pretty-printed JSON with 2-space indentation.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` formatting errors.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Value::Object(self.serialize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(name: &str) -> FieldNode {
        FieldNode::new().named(name).typed("nested")
    }

    #[test]
    fn insert_at_front_middle_end() {
        let mut seq = Vec::new();
        let a = create_node();
        let b = create_node();
        let c = create_node();
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());

        insert(&mut seq, 0, b).unwrap();
        insert(&mut seq, 0, a).unwrap();
        insert(&mut seq, 2, c).unwrap();

        let ids: Vec<NodeId> = seq.iter().map(FieldNode::id).collect();
        assert_eq!(ids, vec![a_id, b_id, c_id]);
    }

    #[test]
    fn insert_out_of_range_is_usage_error() {
        let mut seq = vec![create_node()];
        let err = insert(&mut seq, 2, create_node()).unwrap_err();
        assert_eq!(err, SchemaError::IndexOutOfBounds { index: 2, len: 1 });
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut seq = vec![create_node()];
        let stranger = create_node();
        assert!(remove(&mut seq, stranger.id()).is_none());
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut seq = Vec::new();
        let id = push(&mut seq, create_node());
        assert!(remove(&mut seq, id).is_some());
        assert!(remove(&mut seq, id).is_none());
        assert!(seq.is_empty());
    }

    #[test]
    fn update_field_missing_is_noop() {
        let mut seq = vec![create_node().named("kept")];
        let stranger = create_node();
        assert!(!update_field(&mut seq, stranger.id(), FieldUpdate::Required(true)));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].name(), "kept");
        assert!(!seq[0].required());
    }

    #[test]
    fn update_field_only_touches_direct_siblings() {
        let mut parent = nested("address");
        let child = FieldNode::new();
        let child_id = child.id();
        parent.children_mut().unwrap().push(child);
        let mut seq = vec![parent];

        assert!(!update_field(&mut seq, child_id, FieldUpdate::Name("city".into())));
        let children = seq[0].children_mut().unwrap();
        assert!(update_field(children, child_id, FieldUpdate::Name("city".into())));
        assert_eq!(seq[0].children()[0].name(), "city");
    }

    #[test]
    fn append_under_nested_parent() {
        let mut tree = SchemaTree::new();
        let parent = tree.append(None).unwrap();
        tree.update(parent, FieldUpdate::Type(Some("nested".into())));
        let child = tree.append(Some(parent)).unwrap();
        let grandchild_parent = tree.append(Some(parent)).unwrap();
        tree.update(grandchild_parent, FieldUpdate::Type(Some("nested".into())));
        let grandchild = tree.append(Some(grandchild_parent)).unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node_count(), 4);
        assert!(tree.contains(child));
        assert!(tree.contains(grandchild));
    }

    #[test]
    fn append_under_plain_parent_is_rejected() {
        let mut tree = SchemaTree::new();
        let parent = tree.append(None).unwrap();
        tree.update(parent, FieldUpdate::Type(Some("string".into())));

        assert_eq!(tree.append(Some(parent)), Err(SchemaError::NotNested(parent)));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn append_under_unknown_parent_is_rejected() {
        let mut tree = SchemaTree::new();
        let stranger = create_node().id();
        assert_eq!(tree.append(Some(stranger)), Err(SchemaError::UnknownNode(stranger)));
    }

    #[test]
    fn duplicate_inserted_through_sequence_keeps_identities_distinct() {
        let mut tree = SchemaTree::new();
        let original = tree.insert_at(None, 0, nested("address")).unwrap();
        let child = tree.append(Some(original)).unwrap();

        let copy = tree.find(original).unwrap().duplicate();
        let copy_id = copy.id();
        insert(tree.sequence_mut(None).unwrap(), 1, copy).unwrap();

        let ids: Vec<NodeId> = tree.iter_depth_first().map(FieldNode::id).collect();
        let mut distinct = ids.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(distinct.len(), ids.len());

        assert!(tree.remove(original).is_some());
        assert!(!tree.contains(original));
        assert!(!tree.contains(child));
        assert!(tree.contains(copy_id));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn insert_at_index_checked_against_target_sequence() {
        let mut tree = SchemaTree::new();
        let parent = tree.insert_at(None, 0, nested("address")).unwrap();
        tree.append(None).unwrap();

        let err = tree.insert_at(Some(parent), 1, create_node()).unwrap_err();
        assert_eq!(err, SchemaError::IndexOutOfBounds { index: 1, len: 0 });
    }

    #[test]
    fn remove_at_depth_discards_subtree() {
        let mut tree = SchemaTree::new();
        let root = tree.insert_at(None, 0, nested("a")).unwrap();
        let mid = tree.insert_at(Some(root), 0, nested("b")).unwrap();
        let leaf = tree.append(Some(mid)).unwrap();

        let removed = tree.remove(mid).unwrap();
        assert_eq!(removed.id(), mid);
        assert_eq!(removed.children().len(), 1);
        assert!(!tree.contains(mid));
        assert!(!tree.contains(leaf));
        assert!(tree.contains(root));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn operations_on_destroyed_identity_are_noops() {
        let mut tree = SchemaTree::new();
        let id = tree.append(None).unwrap();
        tree.remove(id);

        assert!(tree.remove(id).is_none());
        assert!(!tree.update(id, FieldUpdate::Name("ghost".into())));
        assert!(tree.find(id).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn type_change_through_tree_truncates_subtree() {
        let mut tree = SchemaTree::new();
        let root = tree.insert_at(None, 0, nested("address")).unwrap();
        let child = tree.append(Some(root)).unwrap();

        assert!(tree.update(root, FieldUpdate::Type(Some("boolean".into()))));

        assert!(tree.find(root).unwrap().children().is_empty());
        assert!(!tree.contains(child));
        assert!(!tree.update(child, FieldUpdate::Required(true)));
    }

    #[test]
    fn depth_first_is_pre_order() {
        let mut tree = SchemaTree::new();
        let a = tree.insert_at(None, 0, nested("a")).unwrap();
        let a1 = tree.insert_at(Some(a), 0, FieldNode::new().named("a1")).unwrap();
        let a2 = tree.insert_at(Some(a), 1, FieldNode::new().named("a2")).unwrap();
        let b = tree.insert_at(None, 1, FieldNode::new().named("b")).unwrap();

        let order: Vec<NodeId> = tree.iter_depth_first().map(FieldNode::id).collect();
        assert_eq!(order, vec![a, a1, a2, b]);
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let mut tree = SchemaTree::new();
        tree.insert_at(None, 0, FieldNode::new().named("age").typed("number"))
            .unwrap();
        assert_eq!(tree.to_pretty_json().unwrap(), "{\n  \"age\": \"number\"\n}");
    }

    #[test]
    fn empty_tree_serializes_to_empty_object() {
        let tree = SchemaTree::new();
        assert!(tree.serialize().is_empty());
        assert_eq!(tree.to_pretty_json().unwrap(), "{}");
    }
}
