//! Text editing tests - insert, delete, format toggles, undo/redo

mod common;

use common::{assert_length_invariant, test_editor, test_editor_with_selection, text_changes};
use richline::document::{Color, FormatAttribute, TextFormat};
use richline::editable::{ChangeOrigin, Cursor, DocumentEditor, EditConstraints, EditorEvent};
use richline::Document;

// ========================================================================
// Insert
// ========================================================================

#[test]
fn test_insert_replaces_selection_law() {
    let text = "The quick brown fox";
    let cases = [(0, 0), (4, 9), (9, 4), (0, 19), (16, 19)];
    for (anchor, position) in cases {
        let mut editor = test_editor_with_selection(text, anchor, position);
        let (start, end) = (anchor.min(position), anchor.max(position));
        editor.insert("slow", TextFormat::PlainText);

        let expected: String = text
            .chars()
            .take(start)
            .chain("slow".chars())
            .chain(text.chars().skip(end))
            .collect();
        assert_eq!(editor.text(), expected, "selection {anchor}..{position}");
        assert_eq!(editor.cursor(), Cursor::collapsed(start + 4));
    }
}

#[test]
fn test_insert_multiple_paragraphs() {
    let mut editor = test_editor("ad", 1);
    let inserted = editor.insert("b\r\nc", TextFormat::PlainText);
    assert_eq!(inserted, 3);
    assert_eq!(editor.text(), "ab\ncd");
    assert_eq!(editor.document().unwrap().paragraph_count(), 2);
    assert_eq!(editor.cursor_position(), Some(4));
    assert_length_invariant(editor.document().unwrap());
}

#[test]
fn test_insert_auto_detects_markup() {
    let mut editor = test_editor("", 0);
    let inserted = editor.insert("<i>hi</i> there", TextFormat::Auto);
    assert_eq!(inserted, 8);
    assert_eq!(editor.text(), "hi there");
    let document = editor.document().unwrap();
    assert!(document.format_of_char(0).is_italic());
    assert!(!document.format_of_char(3).is_italic());
}

#[test]
fn test_plain_hint_keeps_tags_literal() {
    let mut editor = test_editor("", 0);
    editor.insert("<b>x</b>", TextFormat::PlainText);
    assert_eq!(editor.text(), "<b>x</b>");
}

#[test]
fn test_insert_at_keeps_text_after_selection_in_place() {
    let mut editor = test_editor_with_selection("abcdef", 1, 3);
    editor.insert_at(5, "X", TextFormat::PlainText);
    assert_eq!(editor.text(), "adeXf");
    assert_eq!(editor.cursor(), Cursor::collapsed(4));
}

#[test]
fn test_typed_text_continues_bold_run() {
    let mut editor = test_editor_with_selection("<b>bold</b> plain", 4, 4);
    editor.insert("er", TextFormat::PlainText);
    assert_eq!(editor.text(), "bolder plain");
    assert!(editor.document().unwrap().format_of_char(5).is_bold());
    assert!(!editor.document().unwrap().format_of_char(6).is_bold());
}

#[test]
fn test_insert_fires_text_changed_once() {
    let mut editor = test_editor("", 0);
    editor.insert("a\nb\nc", TextFormat::PlainText);
    let events = editor.take_events();
    assert_eq!(text_changes(&events), 1);
    // Host calls are programmatic
    assert!(!events
        .iter()
        .any(|e| matches!(e, EditorEvent::TextEdited(_))));
}

#[test]
fn test_user_batch_reports_text_edited() {
    let mut editor = test_editor("", 0);
    editor.batch_as(ChangeOrigin::User, |editor| {
        editor.insert("a", TextFormat::PlainText);
        editor.insert("b", TextFormat::PlainText);
    });
    let events = editor.take_events();
    assert_eq!(text_changes(&events), 1);
    assert!(events.contains(&EditorEvent::TextEdited("ab".to_string())));
}

// ========================================================================
// Delete
// ========================================================================

#[test]
fn test_delete_backward_merges_paragraphs() {
    let mut editor = test_editor("ab\ncd", 3);
    assert!(editor.delete_backward());
    assert_eq!(editor.text(), "abcd");
    assert_eq!(editor.document().unwrap().paragraph_count(), 1);
    assert_eq!(editor.cursor_position(), Some(2));
}

#[test]
fn test_delete_forward_merges_paragraphs() {
    let mut editor = test_editor("ab\ncd", 2);
    assert!(editor.delete_forward());
    assert_eq!(editor.text(), "abcd");
    assert_eq!(editor.cursor_position(), Some(2));
}

#[test]
fn test_delete_at_document_edges_is_noop() {
    let mut editor = test_editor("ab", 0);
    assert!(!editor.delete_backward());
    editor.move_to(2, false);
    editor.take_events();
    assert!(!editor.delete_forward());
    assert!(editor.take_events().is_empty());
}

#[test]
fn test_delete_selection_across_paragraphs() {
    let mut editor = test_editor_with_selection("one<br>two<br>three", 2, 7);
    assert!(editor.delete_forward());
    assert_eq!(editor.text(), "on\nthree");
    assert_eq!(editor.cursor(), Cursor::collapsed(2));
    assert_length_invariant(editor.document().unwrap());
}

#[test]
fn test_delete_words() {
    let mut editor = test_editor("alpha beta gamma", 10);
    assert!(editor.delete_word_backward());
    assert_eq!(editor.text(), "alpha  gamma");
    assert!(editor.delete_word_forward());
    assert_eq!(editor.text(), "alpha gamma");
}

#[test]
fn test_set_text_replaces_everything() {
    let mut editor = test_editor_with_selection("<b>old</b><br>text", 1, 2);
    editor.set_text("new");
    assert_eq!(editor.text(), "new");
    assert_eq!(editor.document().unwrap().paragraph_count(), 1);
    assert_eq!(editor.cursor(), Cursor::collapsed(3));
}

// ========================================================================
// Formatting
// ========================================================================

#[test]
fn test_toggle_bold_flips_each_call() {
    let mut editor = test_editor("plain", 2);
    editor.toggle_format(FormatAttribute::Bold);
    assert!(editor.current_format().unwrap().is_bold());
    editor.toggle_format(FormatAttribute::Bold);
    assert!(!editor.current_format().unwrap().is_bold());
    editor.toggle_format(FormatAttribute::Bold);
    assert!(editor.current_format().unwrap().is_bold());
}

#[test]
fn test_toggle_on_selection_changes_document() {
    let mut editor = test_editor_with_selection("abc", 0, 2);
    editor.toggle_format(FormatAttribute::Underline);
    assert_eq!(editor.document().unwrap().to_markup(), "<u>ab</u>c");
    editor.toggle_format(FormatAttribute::Underline);
    assert_eq!(editor.document().unwrap().to_markup(), "abc");
}

#[test]
fn test_toggle_mixed_selection_follows_first_char() {
    let mut editor = test_editor_with_selection("a<i>bc</i>", 0, 3);
    editor.toggle_format(FormatAttribute::Italic);
    let document = editor.document().unwrap();
    assert!((0..3).all(|i| document.format_of_char(i).is_italic()));
}

#[test]
fn test_text_color_and_clear() {
    let mut editor = test_editor_with_selection("red", 0, 3);
    editor.set_text_color(Color::rgb(255, 0, 0));
    assert_eq!(
        editor.document().unwrap().format_of_char(1).foreground,
        Some(Color::rgb(255, 0, 0))
    );
    editor.set_text_color(Color::transparent());
    assert_eq!(editor.document().unwrap().format_of_char(1).foreground, None);
}

// ========================================================================
// Undo / Redo
// ========================================================================

#[test]
fn test_undo_redo_typing_and_delete() {
    let mut editor = test_editor("hello", 5);
    editor.insert(" world", TextFormat::PlainText);
    editor.set_selection(0, 5);
    editor.delete_backward();
    assert_eq!(editor.text(), " world");

    assert!(editor.undo());
    assert_eq!(editor.text(), "hello world");
    assert_eq!(editor.selected_text(), "hello");
    assert!(editor.undo());
    assert_eq!(editor.text(), "hello");
    assert!(!editor.can_undo());

    assert!(editor.redo());
    assert!(editor.redo());
    assert_eq!(editor.text(), " world");
    assert!(!editor.can_redo());
}

#[test]
fn test_undo_restores_format_toggle() {
    let mut editor = test_editor_with_selection("abc", 0, 3);
    editor.toggle_format(FormatAttribute::Bold);
    assert!(editor.undo());
    assert!(!editor.document().unwrap().format_of_char(0).is_bold());
    assert!(editor.redo());
    assert!(editor.document().unwrap().format_of_char(0).is_bold());
}

#[test]
fn test_new_edit_clears_redo() {
    let mut editor = test_editor("", 0);
    editor.insert("a", TextFormat::PlainText);
    editor.undo();
    editor.insert("b", TextFormat::PlainText);
    assert!(!editor.redo());
    assert_eq!(editor.text(), "b");
}

// ========================================================================
// Read-only and unbound
// ========================================================================

#[test]
fn test_read_only_rejects_every_mutation() {
    let mut editor =
        DocumentEditor::with_document(Document::from_markup("abc"), EditConstraints::read_only());
    editor.set_selection(0, 2);
    editor.take_events();

    assert_eq!(editor.insert("x", TextFormat::PlainText), 0);
    assert!(!editor.delete_backward());
    assert!(!editor.delete_forward());
    editor.toggle_format(FormatAttribute::Bold);
    editor.set_text("gone");

    assert_eq!(editor.text(), "abc");
    assert!(!editor.document().unwrap().is_dirty());
    assert!(editor.take_events().is_empty());
    // Navigation still works
    editor.move_to(3, false);
    assert_eq!(editor.cursor_position(), Some(3));
}

#[test]
fn test_unbound_editor_ignores_edits() {
    let mut editor = DocumentEditor::new(EditConstraints::editor());
    assert_eq!(editor.insert("x", TextFormat::PlainText), 0);
    assert!(!editor.delete_backward());
    editor.toggle_format(FormatAttribute::Bold);
    assert_eq!(editor.text(), "");
    assert_eq!(editor.current_format(), None);
    assert!(editor.take_events().is_empty());
}

#[test]
fn test_rebinding_resets_cursor_and_history() {
    let mut editor = test_editor("abc", 3);
    editor.insert("d", TextFormat::PlainText);
    let old = editor.bind_document(Some(Document::from_plain_text("xy")));
    assert_eq!(old.map(|doc| doc.text()).as_deref(), Some("abcd"));
    assert_eq!(editor.cursor(), Cursor::collapsed(0));
    assert!(!editor.can_undo());
    assert!(editor.take_events().contains(&EditorEvent::DocumentReplaced));
}
