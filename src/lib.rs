//! Richline - cursor, selection and layout engine for subtitle line editors
//!
//! This crate provides the editing core behind rich-text subtitle line
//! controls: a paragraph/fragment document model, a layout projector that
//! can show a whole document on one row, and a cursor controller with
//! selection, undo, input-method composition, clipboard and drag-and-drop.
//!
//! # Layers
//!
//! - [`document`]: paragraphs of formatted fragments, plus the markup codec
//! - [`layout`]: measured lines and offset/pixel mapping
//! - [`editable`]: [`DocumentEditor`], the cursor and edit operations
//! - [`interaction`]: [`LineEditor`], keys, mouse, blink and completion
//!
//! # Example
//!
//! ```
//! use richline::{Document, EngineConfig};
//! use richline::interaction::KeyEvent;
//!
//! let mut line = EngineConfig::default().build_line_editor(Some(Document::from_plain_text("")));
//! for ch in "Hi".chars() {
//!     line.handle_key(&KeyEvent::char(ch));
//! }
//! assert_eq!(line.editor().text(), "Hi");
//! ```

pub mod clipboard;
pub mod composition;
pub mod config;
pub mod config_paths;
pub mod document;
pub mod dragdrop;
pub mod editable;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod theme;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use clipboard::{ClipboardKind, ClipboardPayload, ClipboardService, MemoryClipboard};
pub use composition::{InputMethodAttribute, InputMethodEvent};
pub use config::EngineConfig;
pub use document::{CharFormat, Document, DocumentFragment, FormatAttribute, TextFormat};
pub use dragdrop::{DragData, DropAction, EditorId};
pub use editable::{ChangeOrigin, Cursor, DocumentEditor, EditConstraints, EditorEvent, MoveUnit};
pub use error::{EditError, EditResult};
pub use geometry::{Point, Rect};
pub use interaction::LineEditor;
pub use layout::{LayoutDirection, LayoutMode};
pub use theme::PlatformTheme;
