//! Shared helpers for benchmarks

use richline::editable::{DocumentEditor, EditConstraints};
use richline::Document;

/// Subtitle-like markup with `paragraphs` lines of mixed formatting
#[allow(dead_code)]
pub fn subtitle_markup(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| format!("<i>Line {i}:</i> the <b>quick</b> brown fox <u>jumps</u>"))
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Editor over [`subtitle_markup`] with the cursor at the end
#[allow(dead_code)]
pub fn make_editor(paragraphs: usize) -> DocumentEditor {
    let document = Document::from_markup(&subtitle_markup(paragraphs));
    let mut editor = DocumentEditor::with_document(document, EditConstraints::editor());
    let len = editor.len();
    editor.move_to(len, false);
    editor.take_events();
    editor
}
