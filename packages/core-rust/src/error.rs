use crate::node::NodeId;

/// Usage errors raised by the schema tree.
///
/// These indicate a defect in the calling layer rather than a data condition.
/// Operations on identities that no longer exist are not errors: they are
/// tolerated no-ops and never produce a `SchemaError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("insert index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("node {0} is not nested and cannot hold children")]
    NotNested(NodeId),
    #[error("unknown parent node {0}")]
    UnknownNode(NodeId),
}

/// Result alias for schema tree operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
