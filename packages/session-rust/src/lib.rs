//! Schema Builder Session — headless editing session over a schema tree with a
//! live JSON preview, plus script replay for driving it without a UI.

pub mod config;
pub mod logging;
pub mod observer;
pub mod script;
pub mod session;

pub use config::{Cli, LogConfig, LogFormat, SessionConfig};
pub use observer::{CompositePreviewObserver, PreviewObserver};
pub use script::{replay, ScriptError};
pub use session::{ActionOutcome, EditorAction, EditorSession, SessionError};
