//! Input method composition tests

mod common;

use common::{test_editor, test_line_editor, text_changes};
use richline::composition::{InputMethodAttribute, InputMethodEvent};
use richline::document::{CharFormat, FormatAttribute, TextFormat};
use richline::editable::{Cursor, EditorEvent, MoveUnit};

#[test]
fn test_commit_replaces_preedit_placeholder() {
    let mut editor = test_editor("", 0);
    editor.input_method_event(&InputMethodEvent::preedit("ni"));
    assert_eq!(editor.display_text(), "ni");
    assert_eq!(editor.text(), "");
    editor.take_events();

    editor.input_method_event(&InputMethodEvent::commit("に").with_replacement(0, 2));

    assert_eq!(editor.text(), "に");
    assert!(editor.composition().is_none());
    assert_eq!(text_changes(&editor.take_events()), 1);
}

#[test]
fn test_commit_replaces_committed_text_before_anchor() {
    let mut editor = test_editor("say ab!", 6);
    editor.input_method_event(&InputMethodEvent::preedit("c"));
    editor.take_events();

    editor.input_method_event(&InputMethodEvent::commit("に").with_replacement(-2, 2));

    assert_eq!(editor.text(), "say に!");
    assert_eq!(editor.cursor(), Cursor::collapsed(5));
    assert!(editor.composition().is_none());
    assert_eq!(text_changes(&editor.take_events()), 1);
}

#[test]
fn test_preedit_in_middle_of_text() {
    let mut editor = test_editor("ab\ncd", 4);
    editor.input_method_event(&InputMethodEvent::preedit("xy"));

    assert_eq!(editor.text(), "ab\ncd");
    assert_eq!(editor.display_text(), "ab\ncxyd");
    let layout = editor.layout().unwrap();
    assert_eq!(layout.lines[1].text, "cxyd");
    assert_eq!(layout.lines[0].text, "ab");
    // The document cursor sits after the preedit on screen
    assert_eq!(layout.cursor_to_x(5), layout.lines[1].position.x + 40.0);
}

#[test]
fn test_preedit_updates_replace_each_other() {
    let mut editor = test_editor("", 0);
    editor.input_method_event(&InputMethodEvent::preedit("k"));
    editor.input_method_event(&InputMethodEvent::preedit("ka"));
    editor.input_method_event(&InputMethodEvent::preedit("kan"));
    assert_eq!(editor.display_text(), "kan");

    editor.input_method_event(&InputMethodEvent::commit("漢"));
    assert_eq!(editor.text(), "漢");
    assert_eq!(editor.cursor(), Cursor::collapsed(1));
}

#[test]
fn test_commit_with_new_preedit_in_one_event() {
    let mut editor = test_editor("", 0);
    editor.input_method_event(&InputMethodEvent::preedit("a"));
    let event = InputMethodEvent {
        preedit: "b".to_string(),
        commit: "A".to_string(),
        ..InputMethodEvent::default()
    };
    editor.input_method_event(&event);
    assert_eq!(editor.text(), "A");
    assert_eq!(editor.display_text(), "Ab");
    assert_eq!(editor.composition().unwrap().anchor, 1);
}

#[test]
fn test_replacement_before_anchor() {
    let mut editor = test_editor("hello", 5);
    editor.input_method_event(&InputMethodEvent::commit("p!").with_replacement(-2, 2));
    assert_eq!(editor.text(), "help!");
}

#[test]
fn test_replacement_is_clamped_to_document() {
    let mut editor = test_editor("ab", 1);
    editor.input_method_event(&InputMethodEvent::commit("X").with_replacement(-10, 1));
    assert_eq!(editor.text(), "Xb");

    editor.input_method_event(&InputMethodEvent::commit("Y").with_replacement(10, 3));
    assert_eq!(editor.text(), "XbY");
}

#[test]
fn test_preedit_formats_stay_out_of_document() {
    let mut editor = test_editor("ab", 2);
    let underline = CharFormat::new().with(FormatAttribute::Underline, true);
    let event = InputMethodEvent::preedit("xyz").with_attribute(InputMethodAttribute::TextFormat {
        start: 0,
        length: 3,
        format: underline,
    });
    editor.input_method_event(&event);

    let layout = editor.layout().unwrap();
    assert!(layout.lines[0].format_at(3).is_underline());
    assert!(!layout.lines[0].format_at(1).is_underline());

    editor.commit_preedit();
    let document = editor.document().unwrap();
    assert_eq!(editor.text(), "abxyz");
    assert!(!document.format_of_char(3).is_underline());
}

#[test]
fn test_preedit_cursor_attribute_moves_caret_rect() {
    let mut editor = test_editor("ab", 2);
    let event = InputMethodEvent::preedit("xyz").with_attribute(InputMethodAttribute::Cursor {
        position: 1,
        visible: true,
    });
    editor.input_method_event(&event);
    assert_eq!(editor.cursor_rect().map(|r| r.x), Some(30.0));
}

#[test]
fn test_navigation_commits_preedit() {
    let mut editor = test_editor("ab", 1);
    editor.input_method_event(&InputMethodEvent::preedit("z"));
    editor.move_relative(MoveUnit::EndOfDocument, false, 1);
    assert_eq!(editor.text(), "azb");
    assert_eq!(editor.cursor_position(), Some(3));
}

#[test]
fn test_editing_commits_preedit_first() {
    let mut editor = test_editor("ab", 1);
    editor.input_method_event(&InputMethodEvent::preedit("z"));
    editor.insert("!", TextFormat::PlainText);
    assert_eq!(editor.text(), "az!b");
}

#[test]
fn test_undo_discards_preedit() {
    let mut editor = test_editor("", 0);
    editor.insert("a", TextFormat::PlainText);
    editor.input_method_event(&InputMethodEvent::preedit("q"));
    assert!(editor.undo());
    assert_eq!(editor.display_text(), "");
    assert!(editor.composition().is_none());
}

#[test]
fn test_input_method_edits_are_user_edits() {
    let mut editor = test_editor("", 0);
    editor.input_method_event(&InputMethodEvent::commit("x"));
    assert!(editor
        .take_events()
        .contains(&EditorEvent::TextEdited("x".to_string())));
}

#[test]
fn test_focus_out_commits_preedit() {
    let mut line = test_line_editor("ab");
    line.input_method_event(&InputMethodEvent::preedit("c"));
    line.focus_out();
    assert_eq!(line.editor().text(), "cab");
    assert!(line.editor().composition().is_none());
}
