//! Change notifications emitted by the document editor.

use crate::document::CharFormat;
use crate::geometry::Rect;

/// Who caused a change. Only user-originated text changes produce
/// [`EditorEvent::TextEdited`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Typing, pasting, dropping, IME input
    User,
    /// Calls made by the host application
    #[default]
    Programmatic,
}

/// A notification for collaborators observing the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The visible text (document plus preedit) changed
    DisplayTextChanged(String),
    /// The selected range changed
    SelectionChanged,
    CursorPositionChanged { old: usize, new: usize },
    /// The document text changed, for any reason
    TextChanged(String),
    /// The document text changed because of user input
    TextEdited(String),
    /// Partial redraw hint, in layout coordinates
    UpdateNeeded(Rect),
    /// The format at the cursor changed
    FormatChanged(CharFormat),
    /// A different document was bound (or the binding was cleared)
    DocumentReplaced,
}

impl EditorEvent {
    /// Check if this event reports a text change
    pub fn is_text_change(&self) -> bool {
        matches!(self, EditorEvent::TextChanged(_) | EditorEvent::TextEdited(_))
    }
}

/// Editor state captured when the outermost batch opens, diffed when it
/// closes to decide which events fire.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BatchSnapshot {
    pub revision: Option<u64>,
    pub bind_generation: u64,
    pub display_text: String,
    pub position: usize,
    pub selection: (usize, usize),
    pub format: Option<CharFormat>,
    pub cursor_rect: Option<Rect>,
    pub bounds: Option<Rect>,
    pub selection_bounds: Option<Rect>,
    pub origin: ChangeOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_text_change() {
        assert!(EditorEvent::TextChanged("a".into()).is_text_change());
        assert!(EditorEvent::TextEdited("a".into()).is_text_change());
        assert!(!EditorEvent::SelectionChanged.is_text_change());
        assert_eq!(ChangeOrigin::default(), ChangeOrigin::Programmatic);
    }
}
