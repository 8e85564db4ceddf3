//! Inkpad Core Library
//!
//! Platform-agnostic drawing-session state machine: the scene model, the
//! in-progress draft, the committed undo/redo history and its persistence.

pub mod config;
pub mod draft;
pub mod history;
pub mod input;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod surface;
pub mod tools;

pub use config::SessionConfig;
pub use draft::{Draft, DraftError, begin_draft, finish_draft, update_draft};
pub use history::{History, HistoryError};
pub use input::{KeyEvent, KeyOutcome, Modifiers, PointerEvent, Shortcut, ShortcutAction};
pub use scene::{Scene, SceneError};
pub use session::DrawingSession;
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapePatch};
pub use storage::{HistoryPersistence, KeyValueStore, MemoryStore, PersistenceError, StorageError};
pub use surface::{SceneExporter, Surface};
pub use tools::{ToolKind, ToolManager};
