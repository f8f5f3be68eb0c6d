//! Drag and drop tests - moves within and between editors

mod common;

use common::{test_editor, test_editor_with_selection, test_line_editor, text_changes};
use richline::clipboard::ClipboardPayload;
use richline::dragdrop::{DragData, DropAction};
use richline::editable::{Cursor, EditorEvent};
use richline::geometry::Point;
use richline::interaction::Modifiers;

#[test]
fn test_move_onto_own_selection_leaves_document_unchanged() {
    let mut editor = test_editor_with_selection("a<b>bcd</b>e<br>f", 1, 4);
    let before = editor.document().unwrap().clone();
    let data = editor.start_drag().unwrap();

    for position in 1..4 {
        assert!(!editor.drop_payload(&data, position, DropAction::Move));
    }
    assert!(!editor.finish_drag(&data, Some(DropAction::Move), Some(editor.id())));

    assert_eq!(editor.document().unwrap(), &before);
    assert_eq!(editor.cursor(), Cursor::new(1, 4));
}

#[test]
fn test_move_to_selection_end_is_a_no_op() {
    let mut editor = test_editor_with_selection("abcdef", 1, 3);
    let data = editor.start_drag().unwrap();
    let revision = editor.document().unwrap().revision();
    editor.take_events();

    assert!(!editor.drop_payload(&data, 3, DropAction::Move));
    assert_eq!(editor.text(), "abcdef");
    assert_eq!(editor.cursor(), Cursor::new(1, 3));
    assert_eq!(editor.document().unwrap().revision(), revision);
    assert!(!editor.can_undo());
    assert_eq!(text_changes(&editor.take_events()), 0);
}

#[test]
fn test_move_within_editor_keeps_formats() {
    let mut editor = test_editor_with_selection("<b>ab</b>cd", 0, 2);
    let data = editor.start_drag().unwrap();
    assert!(editor.drop_payload(&data, 4, DropAction::Move));

    assert_eq!(editor.text(), "cdab");
    assert_eq!(editor.document().unwrap().to_markup(), "cd<b>ab</b>");
    assert_eq!(editor.selected_text(), "ab");
}

#[test]
fn test_move_within_editor_can_be_undone() {
    let mut editor = test_editor_with_selection("abcdef", 0, 2);
    let data = editor.start_drag().unwrap();
    editor.drop_payload(&data, 6, DropAction::Move);
    assert_eq!(editor.text(), "cdefab");

    while editor.undo() {}
    assert_eq!(editor.text(), "abcdef");
}

#[test]
fn test_move_between_editors() {
    let mut source = test_editor_with_selection("drag me", 5, 7);
    let mut target = test_editor("to ", 3);
    let data = source.start_drag().unwrap();

    assert!(target.drop_payload(&data, 3, DropAction::Move));
    assert!(source.finish_drag(&data, Some(DropAction::Move), Some(target.id())));

    assert_eq!(source.text(), "drag ");
    assert_eq!(target.text(), "to me");
}

#[test]
fn test_cancelled_drag_keeps_source() {
    let mut source = test_editor_with_selection("keep", 0, 4);
    let data = source.start_drag().unwrap();
    assert!(!source.finish_drag(&data, None, None));
    assert_eq!(source.text(), "keep");
}

#[test]
fn test_copy_between_editors_keeps_source() {
    let mut source = test_editor_with_selection("copy", 0, 4);
    let mut target = test_editor("", 0);
    let data = source.start_drag().unwrap();
    target.drop_payload(&data, 0, DropAction::Copy);
    assert!(!source.finish_drag(&data, Some(DropAction::Copy), Some(target.id())));
    assert_eq!(source.text(), "copy");
    assert_eq!(target.text(), "copy");
}

#[test]
fn test_external_payload_drop() {
    let mut editor = test_editor("ac", 0);
    let data = DragData::external(ClipboardPayload::plain("b"));
    assert!(editor.drop_payload(&data, 1, DropAction::Move));
    assert_eq!(editor.text(), "abc");
}

#[test]
fn test_drop_preview_follows_pointer() {
    let mut editor = test_editor("abcd", 0);
    assert_eq!(editor.drag_move(Point::new(21.0, 5.0)), Some(2));
    assert_eq!(editor.drop_preview(), Some(2));
    assert!(editor
        .take_events()
        .iter()
        .any(|e| matches!(e, EditorEvent::UpdateNeeded(_))));

    editor.drag_leave();
    assert_eq!(editor.drop_preview(), None);
}

#[test]
fn test_mouse_drag_starts_past_threshold() {
    let mut line = test_line_editor("drag this");
    line.editor_mut().set_selection(5, 9);

    line.mouse_press(Point::new(62.0, 5.0), Modifiers::NONE);
    assert!(line.mouse_move(Point::new(65.0, 5.0)).is_none());
    let data = line.mouse_move(Point::new(80.0, 5.0)).unwrap();
    assert_eq!(data.range, (5, 9));
    assert_eq!(data.payload.plain.as_deref(), Some("this"));
    // The selection is not touched while dragging
    assert_eq!(line.editor().selected_text(), "this");
}

#[test]
fn test_click_inside_selection_without_drag_collapses() {
    let mut line = test_line_editor("drag this");
    line.editor_mut().set_selection(5, 9);
    line.mouse_press(Point::new(62.0, 5.0), Modifiers::NONE);
    line.mouse_release(Point::new(62.0, 5.0));
    assert_eq!(line.editor().cursor(), Cursor::collapsed(6));
}

#[test]
fn test_line_editor_drop_at_point() {
    let mut source = test_line_editor("one two");
    source.editor_mut().set_selection(3, 7);
    let data = source.editor().start_drag().unwrap();

    let mut target = test_line_editor("zero");
    assert!(target.drop_at(&data, Point::new(100.0, 5.0), DropAction::Move));
    assert!(source.finish_drag(&data, Some(DropAction::Move), Some(target.id())));
    assert_eq!(target.editor().text(), "zero two");
    assert_eq!(source.editor().text(), "one");
}
