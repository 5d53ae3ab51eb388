//! Headless editing session.
//!
//! [`EditorSession`] plays the part of the presentation layer: it owns the one
//! [`SchemaTree`] of the session, turns discrete user actions into tree
//! mutations, and re-serializes the preview after every mutation.
//!
//! Actions address rows by index path from the root (`[0, 2]` is the third
//! child of the first root row), the way an editor addresses the rows it
//! renders.

use std::sync::Arc;

use schema_builder_core::{
    create_node, list_types, FieldType, FieldUpdate, NodeId, SchemaError, SchemaTree,
};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::observer::{CompositePreviewObserver, PreviewObserver};

/// Errors returned by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("no row at path {path:?}")]
    UnknownParent { path: Vec<usize> },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preview is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One user action against the schema being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditorAction {
    /// Add an empty row under `parent` (empty path: the root sequence), at
    /// `index` or at the end.
    AddRow {
        #[serde(default)]
        parent: Vec<usize>,
        #[serde(default)]
        index: Option<usize>,
    },
    /// Remove a row and its subtree.
    RemoveRow { path: Vec<usize> },
    SetName { path: Vec<usize>, name: String },
    /// Pick a type. A missing or empty `type_id` unsets it.
    SetType {
        path: Vec<usize>,
        #[serde(default)]
        type_id: Option<String>,
    },
    SetRequired { path: Vec<usize>, required: bool },
}

/// What an applied action did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Added(NodeId),
    Removed(NodeId),
    Updated(NodeId),
    /// The action addressed a row that does not exist.
    Unchanged,
}

impl ActionOutcome {
    /// The node the action changed, if any.
    #[must_use]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::Updated(id) => Some(id),
            Self::Unchanged => None,
        }
    }
}

/// A single editing session over one schema tree.
pub struct EditorSession {
    indent: usize,
    tree: SchemaTree,
    preview: Map<String, Value>,
    observers: CompositePreviewObserver,
}

impl EditorSession {
    /// Starts a session with an empty root sequence. Only the preview
    /// settings are kept; logging is installed by the caller beforehand.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            indent: config.indent,
            tree: SchemaTree::new(),
            preview: Map::new(),
            observers: CompositePreviewObserver::default(),
        }
    }

    /// Spaces per indentation level in [`EditorSession::preview_text`].
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent
    }

    #[must_use]
    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// The type picker catalog.
    #[must_use]
    pub fn field_types(&self) -> &'static [FieldType] {
        list_types()
    }

    /// Registers an observer notified after every mutation.
    pub fn add_observer(&mut self, observer: Arc<dyn PreviewObserver>) {
        self.observers.add(observer);
    }

    /// Resolves an index path to the identity of the row it points at.
    #[must_use]
    pub fn resolve(&self, path: &[usize]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut node = self.tree.roots().get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node.id())
    }

    /// Applies one action and refreshes the preview if the tree changed.
    ///
    /// # Errors
    ///
    /// Adding under a path that does not resolve, under a non-nested row, or
    /// at an out-of-range index is a usage error. Every other action on a
    /// missing row is a no-op reported as [`ActionOutcome::Unchanged`].
    pub fn apply(&mut self, action: EditorAction) -> Result<ActionOutcome, SessionError> {
        debug!(?action, "apply action");
        let outcome = self.apply_inner(action).inspect_err(|err| {
            warn!(error = %err, "action rejected");
        })?;
        if let Some(changed) = outcome.node() {
            self.refresh(changed);
        }
        Ok(outcome)
    }

    fn apply_inner(&mut self, action: EditorAction) -> Result<ActionOutcome, SessionError> {
        let outcome = match action {
            EditorAction::AddRow { parent, index } => {
                let parent_id = if parent.is_empty() {
                    None
                } else {
                    Some(
                        self.resolve(&parent)
                            .ok_or(SessionError::UnknownParent { path: parent })?,
                    )
                };
                let id = match index {
                    Some(index) => self.tree.insert_at(parent_id, index, create_node())?,
                    None => self.tree.append(parent_id)?,
                };
                ActionOutcome::Added(id)
            }
            EditorAction::RemoveRow { path } => {
                match self.resolve(&path).and_then(|id| self.tree.remove(id)) {
                    Some(removed) => ActionOutcome::Removed(removed.id()),
                    None => ActionOutcome::Unchanged,
                }
            }
            EditorAction::SetName { path, name } => self.update(&path, FieldUpdate::Name(name)),
            EditorAction::SetType { path, type_id } => {
                let type_id = type_id.filter(|id| !id.is_empty());
                self.update(&path, FieldUpdate::Type(type_id))
            }
            EditorAction::SetRequired { path, required } => {
                self.update(&path, FieldUpdate::Required(required))
            }
        };
        Ok(outcome)
    }

    fn update(&mut self, path: &[usize], update: FieldUpdate) -> ActionOutcome {
        match self.resolve(path) {
            Some(id) if self.tree.update(id, update) => ActionOutcome::Updated(id),
            _ => ActionOutcome::Unchanged,
        }
    }

    fn refresh(&mut self, changed: NodeId) {
        self.preview = self.tree.serialize();
        self.observers.on_preview(changed, &self.preview);
    }

    /// The JSON document for the current tree.
    #[must_use]
    pub fn preview(&self) -> &Map<String, Value> {
        &self.preview
    }

    /// The preview pretty-printed with the configured indentation.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization errors and rejects output that
    /// is not UTF-8.
    pub fn preview_text(&self) -> Result<String, SessionError> {
        let indent = " ".repeat(self.indent);
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.preview.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
