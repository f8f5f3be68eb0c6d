//! Cursor and selection controller for rich subtitle documents.
//!
//! # Architecture
//!
//! - [`DocumentEditor`]: owns the bound [`Document`](crate::document::Document),
//!   the [`Cursor`], the cached layout and the undo [`EditHistory`]
//! - [`EditConstraints`]: read-only mode and insertion limits
//! - [`EditorEvent`]: change notifications, drained with
//!   [`DocumentEditor::take_events`]
//!
//! Operations are spread over `navigation`, `editing` and `formatting`,
//! each adding an `impl DocumentEditor` block.
//!
//! # Example
//!
//! ```
//! use richline::document::{Document, TextFormat};
//! use richline::editable::{DocumentEditor, EditConstraints, MoveUnit};
//!
//! let mut editor = DocumentEditor::with_document(
//!     Document::from_plain_text("Hello world"),
//!     EditConstraints::editor(),
//! );
//! editor.move_relative(MoveUnit::EndOfDocument, false, 1);
//! editor.insert("!", TextFormat::PlainText);
//! assert_eq!(editor.text(), "Hello world!");
//! ```

mod constraints;
mod cursor;
mod editing;
mod editor;
mod events;
mod formatting;
mod history;
mod navigation;

pub(crate) use editor::Insertion;

pub use constraints::{CharFilter, EditConstraints};
pub use cursor::Cursor;
pub use editor::DocumentEditor;
pub use events::{ChangeOrigin, EditorEvent};
pub use history::{EditHistory, EditOperation};
pub use navigation::MoveUnit;
