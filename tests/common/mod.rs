//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use richline::editable::{DocumentEditor, EditConstraints, EditorEvent};
use richline::interaction::{KeyEvent, LineEditor};
use richline::layout::LayoutMode;
use richline::theme::{KeyboardScheme, PlatformTheme};
use richline::Document;

/// Create an editable editor over plain text (`\n` splits paragraphs),
/// with the cursor at `position` and the setup events drained
pub fn test_editor(text: &str, position: usize) -> DocumentEditor {
    let mut editor =
        DocumentEditor::with_document(Document::from_plain_text(text), EditConstraints::editor());
    editor.move_to(position, false);
    editor.take_events();
    editor
}

/// Create an editor from markup with a selection from `anchor` to `position`
pub fn test_editor_with_selection(markup: &str, anchor: usize, position: usize) -> DocumentEditor {
    let mut editor =
        DocumentEditor::with_document(Document::from_markup(markup), EditConstraints::editor());
    editor.set_selection(anchor, position);
    editor.take_events();
    editor
}

/// Same as [`test_editor`] in `MultiLine` layout mode
pub fn test_multi_line_editor(text: &str, position: usize) -> DocumentEditor {
    let mut editor = test_editor(text, position);
    editor.set_layout_mode(LayoutMode::MultiLine);
    editor.take_events();
    editor
}

/// A focused line editor with the Windows key scheme
pub fn test_line_editor(text: &str) -> LineEditor {
    let mut line = LineEditor::new(
        test_editor(text, 0),
        PlatformTheme::with_scheme(KeyboardScheme::Windows),
    );
    line.focus_in();
    line.take_events();
    line
}

/// Type each character as a key press
pub fn type_text(line: &mut LineEditor, text: &str) {
    for ch in text.chars() {
        line.handle_key(&KeyEvent::char(ch));
    }
}

/// Count events matching `pred`
pub fn count_events(events: &[EditorEvent], pred: impl Fn(&EditorEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// Number of `TextChanged` notifications
pub fn text_changes(events: &[EditorEvent]) -> usize {
    count_events(events, |e| matches!(e, EditorEvent::TextChanged(_)))
}

/// Check the flattened length invariant against the paragraphs
pub fn assert_length_invariant(document: &Document) {
    let paragraphs: usize = document.paragraphs().iter().map(|p| p.len()).sum();
    assert_eq!(
        document.len(),
        paragraphs + document.paragraph_count() - 1,
        "length must count one separator between paragraphs"
    );
    for paragraph in document.paragraphs() {
        let fragments: usize = paragraph.fragments().iter().map(|f| f.len()).sum();
        assert_eq!(paragraph.len(), fragments);
    }
}
