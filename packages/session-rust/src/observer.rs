//! Preview observer trait and composite implementation.
//!
//! Defines [`PreviewObserver`] for reacting to a refreshed JSON preview after
//! a schema mutation, and [`CompositePreviewObserver`] which fans out
//! notifications to multiple observers.

use std::sync::Arc;

use schema_builder_core::NodeId;
use serde_json::{Map, Value};

/// Observer for preview refreshes within an `EditorSession`.
///
/// Used as `Arc<dyn PreviewObserver>`.
pub trait PreviewObserver: Send + Sync {
    /// Called after a mutation with the freshly serialized schema.
    /// `changed` is the node the mutation addressed.
    fn on_preview(&self, changed: NodeId, preview: &Map<String, Value>);
}

/// Composite observer that fans out to multiple observers.
#[derive(Default)]
pub struct CompositePreviewObserver {
    observers: Vec<Arc<dyn PreviewObserver>>,
}

impl CompositePreviewObserver {
    /// Creates a composite observer with the given list of observers.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn PreviewObserver>>) -> Self {
        Self { observers }
    }

    /// Adds an observer after construction.
    pub fn add(&mut self, observer: Arc<dyn PreviewObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl PreviewObserver for CompositePreviewObserver {
    fn on_preview(&self, changed: NodeId, preview: &Map<String, Value>) {
        for observer in &self.observers {
            observer.on_preview(changed, preview);
        }
    }
}
