//! Typed editing commands and the key classification table.
//!
//! A key press is classified once into an [`EditCommand`]; the line editor
//! then dispatches the command. Keys that classify to nothing are left for
//! the host.

use crate::document::FormatAttribute;
use crate::editable::MoveUnit;
use crate::theme::KeyboardScheme;

use super::keys::{KeyCode, KeyEvent};

/// Every operation a key press can trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Move the cursor, extending the selection when `extend` is set
    Move { unit: MoveUnit, extend: bool },
    SelectAll,

    /// Insert typed text at the cursor
    Insert(String),
    /// Split the paragraph at the cursor
    InsertParagraphBreak,

    DeleteBackward,
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    /// Delete from the cursor to the end of its line
    DeleteToEndOfLine,

    Copy,
    Cut,
    Paste,

    Undo,
    Redo,

    ToggleFormat(FormatAttribute),

    /// Enter/Tab: accept a pending inline completion
    AcceptCompletion,
}

impl EditCommand {
    /// Check if this command modifies the document
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            EditCommand::Insert(_)
                | EditCommand::InsertParagraphBreak
                | EditCommand::DeleteBackward
                | EditCommand::DeleteForward
                | EditCommand::DeleteWordBackward
                | EditCommand::DeleteWordForward
                | EditCommand::DeleteToEndOfLine
                | EditCommand::Cut
                | EditCommand::Paste
                | EditCommand::Undo
                | EditCommand::Redo
                | EditCommand::ToggleFormat(_)
                | EditCommand::AcceptCompletion
        )
    }

    /// Check if this command is allowed on a read-only editor
    pub fn is_read_only_safe(&self) -> bool {
        !self.is_editing()
    }

    fn move_by(unit: MoveUnit, extend: bool) -> Self {
        EditCommand::Move { unit, extend }
    }
}

/// Whether typed text may be inserted: no control characters other than
/// tab, and no Ctrl/Meta accelerator chords (Ctrl+Alt is AltGr on some
/// layouts and stays acceptable).
pub fn is_acceptable_input(event: &KeyEvent) -> bool {
    if event.text.is_empty() {
        return false;
    }
    if (event.mods.ctrl() || event.mods.meta()) && !event.mods.alt() {
        return false;
    }
    event.text.chars().all(|c| c == '\t' || !c.is_control())
}

/// Map a key press to a command under `scheme`.
pub fn classify(event: &KeyEvent, scheme: KeyboardScheme) -> Option<EditCommand> {
    let mods = event.mods;
    let shift = mods.shift();
    // The platform's primary accelerator key
    let primary = match scheme {
        KeyboardScheme::Mac => mods.meta(),
        _ => mods.ctrl(),
    };
    // Word-wise navigation modifier
    let word = match scheme {
        KeyboardScheme::Mac => mods.alt(),
        _ => mods.ctrl(),
    };

    let command = match event.key {
        KeyCode::Left | KeyCode::Right => {
            let backward = event.key == KeyCode::Left;
            let unit = match (scheme, mods.meta(), word) {
                (KeyboardScheme::Mac, true, _) if backward => MoveUnit::StartOfLine,
                (KeyboardScheme::Mac, true, _) => MoveUnit::EndOfLine,
                (_, _, true) if backward => MoveUnit::PrevWord,
                (_, _, true) => MoveUnit::NextWord,
                _ if backward => MoveUnit::PrevChar,
                _ => MoveUnit::NextChar,
            };
            EditCommand::move_by(unit, shift)
        }
        KeyCode::Up | KeyCode::Down => {
            let up = event.key == KeyCode::Up;
            let unit = match (scheme, primary) {
                (KeyboardScheme::Mac, true) if up => MoveUnit::StartOfDocument,
                (KeyboardScheme::Mac, true) => MoveUnit::EndOfDocument,
                _ if up => MoveUnit::PreviousLine,
                _ => MoveUnit::NextLine,
            };
            EditCommand::move_by(unit, shift)
        }
        KeyCode::Home | KeyCode::End => {
            let home = event.key == KeyCode::Home;
            // Home/End leave the line on macOS
            let document = scheme == KeyboardScheme::Mac || mods.ctrl();
            let unit = match (document, home) {
                (true, true) => MoveUnit::StartOfDocument,
                (true, false) => MoveUnit::EndOfDocument,
                (false, true) => MoveUnit::StartOfLine,
                (false, false) => MoveUnit::EndOfLine,
            };
            EditCommand::move_by(unit, shift)
        }
        KeyCode::Backspace if word => EditCommand::DeleteWordBackward,
        KeyCode::Backspace => EditCommand::DeleteBackward,
        KeyCode::Delete if shift && scheme != KeyboardScheme::Mac => EditCommand::Cut,
        KeyCode::Delete if word => EditCommand::DeleteWordForward,
        KeyCode::Delete => EditCommand::DeleteForward,
        KeyCode::Insert if shift => EditCommand::Paste,
        KeyCode::Insert if mods.ctrl() => EditCommand::Copy,
        KeyCode::Enter if shift => EditCommand::InsertParagraphBreak,
        KeyCode::Enter | KeyCode::Tab if mods.without_shift().is_empty() => {
            EditCommand::AcceptCompletion
        }
        KeyCode::Char(_) if primary && !mods.alt() => return classify_chord(event, scheme),
        KeyCode::Char(c) if scheme == KeyboardScheme::Mac && mods.ctrl() && !mods.alt() => {
            // Emacs-style bindings that macOS text fields honor
            match c.to_ascii_lowercase() {
                'a' => EditCommand::move_by(MoveUnit::StartOfLine, shift),
                'e' => EditCommand::move_by(MoveUnit::EndOfLine, shift),
                'k' => EditCommand::DeleteToEndOfLine,
                _ => return None,
            }
        }
        _ if is_acceptable_input(event) => EditCommand::Insert(event.text.clone()),
        _ => return None,
    };
    Some(command)
}

/// Primary-modifier chords on character keys
fn classify_chord(event: &KeyEvent, scheme: KeyboardScheme) -> Option<EditCommand> {
    let KeyCode::Char(c) = event.key else {
        return None;
    };
    let shift = event.mods.shift();
    let command = match c.to_ascii_lowercase() {
        'a' => EditCommand::SelectAll,
        'c' => EditCommand::Copy,
        'x' => EditCommand::Cut,
        'v' => EditCommand::Paste,
        'z' if shift => EditCommand::Redo,
        'z' => EditCommand::Undo,
        'y' if scheme == KeyboardScheme::Windows => EditCommand::Redo,
        'b' => EditCommand::ToggleFormat(FormatAttribute::Bold),
        'i' => EditCommand::ToggleFormat(FormatAttribute::Italic),
        'u' => EditCommand::ToggleFormat(FormatAttribute::Underline),
        'k' if scheme != KeyboardScheme::Mac => EditCommand::DeleteToEndOfLine,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Modifiers;

    fn key(key: KeyCode, mods: Modifiers) -> KeyEvent {
        KeyEvent::new(key, mods)
    }

    fn mv(unit: MoveUnit, extend: bool) -> Option<EditCommand> {
        Some(EditCommand::Move { unit, extend })
    }

    #[test]
    fn test_arrow_table_windows() {
        let s = KeyboardScheme::Windows;
        let cases = [
            (KeyCode::Left, Modifiers::NONE, mv(MoveUnit::PrevChar, false)),
            (KeyCode::Right, Modifiers::SHIFT, mv(MoveUnit::NextChar, true)),
            (KeyCode::Left, Modifiers::CTRL, mv(MoveUnit::PrevWord, false)),
            (
                KeyCode::Right,
                Modifiers::CTRL | Modifiers::SHIFT,
                mv(MoveUnit::NextWord, true),
            ),
            (KeyCode::Home, Modifiers::NONE, mv(MoveUnit::StartOfLine, false)),
            (KeyCode::End, Modifiers::SHIFT, mv(MoveUnit::EndOfLine, true)),
            (KeyCode::Home, Modifiers::CTRL, mv(MoveUnit::StartOfDocument, false)),
            (KeyCode::Up, Modifiers::NONE, mv(MoveUnit::PreviousLine, false)),
            (KeyCode::Down, Modifiers::SHIFT, mv(MoveUnit::NextLine, true)),
        ];
        for (code, mods, expected) in cases {
            assert_eq!(classify(&key(code, mods), s), expected, "{code:?} {mods}");
        }
    }

    #[test]
    fn test_arrow_table_mac() {
        let s = KeyboardScheme::Mac;
        assert_eq!(
            classify(&key(KeyCode::Left, Modifiers::ALT), s),
            mv(MoveUnit::PrevWord, false)
        );
        assert_eq!(
            classify(&key(KeyCode::Right, Modifiers::META | Modifiers::SHIFT), s),
            mv(MoveUnit::EndOfLine, true)
        );
        assert_eq!(
            classify(&key(KeyCode::Up, Modifiers::META), s),
            mv(MoveUnit::StartOfDocument, false)
        );
        assert_eq!(
            classify(&key(KeyCode::End, Modifiers::NONE), s),
            mv(MoveUnit::EndOfDocument, false)
        );
        assert_eq!(
            classify(&KeyEvent::char_with_mods('e', Modifiers::CTRL), s),
            mv(MoveUnit::EndOfLine, false)
        );
    }

    #[test]
    fn test_chords() {
        let win = KeyboardScheme::Windows;
        let x11 = KeyboardScheme::X11;
        let ctrl = |c| KeyEvent::char_with_mods(c, Modifiers::CTRL);
        assert_eq!(classify(&ctrl('c'), win), Some(EditCommand::Copy));
        assert_eq!(classify(&ctrl('V'), win), Some(EditCommand::Paste));
        assert_eq!(classify(&ctrl('y'), win), Some(EditCommand::Redo));
        assert_eq!(classify(&ctrl('y'), x11), None);
        assert_eq!(
            classify(
                &KeyEvent::char_with_mods('z', Modifiers::CTRL | Modifiers::SHIFT),
                x11
            ),
            Some(EditCommand::Redo)
        );
        assert_eq!(
            classify(&ctrl('b'), win),
            Some(EditCommand::ToggleFormat(FormatAttribute::Bold))
        );
        assert_eq!(
            classify(&KeyEvent::char_with_mods('a', Modifiers::META), KeyboardScheme::Mac),
            Some(EditCommand::SelectAll)
        );
    }

    #[test]
    fn test_editing_keys() {
        let s = KeyboardScheme::X11;
        assert_eq!(
            classify(&key(KeyCode::Backspace, Modifiers::NONE), s),
            Some(EditCommand::DeleteBackward)
        );
        assert_eq!(
            classify(&key(KeyCode::Delete, Modifiers::CTRL), s),
            Some(EditCommand::DeleteWordForward)
        );
        assert_eq!(
            classify(&key(KeyCode::Delete, Modifiers::SHIFT), s),
            Some(EditCommand::Cut)
        );
        assert_eq!(
            classify(&key(KeyCode::Insert, Modifiers::SHIFT), s),
            Some(EditCommand::Paste)
        );
        assert_eq!(
            classify(&key(KeyCode::Enter, Modifiers::SHIFT), s),
            Some(EditCommand::InsertParagraphBreak)
        );
        assert_eq!(
            classify(&key(KeyCode::Tab, Modifiers::NONE), s),
            Some(EditCommand::AcceptCompletion)
        );
    }

    #[test]
    fn test_printable_falls_through_to_insert() {
        let s = KeyboardScheme::Windows;
        assert_eq!(
            classify(&KeyEvent::char('é'), s),
            Some(EditCommand::Insert("é".to_string()))
        );
        // AltGr arrives as Ctrl+Alt and still types
        assert_eq!(
            classify(
                &KeyEvent::char_with_mods('@', Modifiers::CTRL | Modifiers::ALT),
                s
            ),
            Some(EditCommand::Insert("@".to_string()))
        );
        assert_eq!(classify(&KeyEvent::char_with_mods('q', Modifiers::CTRL), s), None);
    }

    #[test]
    fn test_acceptable_input_filter() {
        assert!(is_acceptable_input(&KeyEvent::char('x')));
        assert!(!is_acceptable_input(&KeyEvent::char('\u{1b}')));
        assert!(!is_acceptable_input(&KeyEvent::char('\u{7f}')));
        assert!(!is_acceptable_input(&KeyEvent::char_with_mods('x', Modifiers::META)));
        assert!(!is_acceptable_input(&KeyEvent::new(KeyCode::Other, Modifiers::NONE)));
    }

    #[test]
    fn test_command_categories() {
        assert!(EditCommand::Insert("a".into()).is_editing());
        assert!(!EditCommand::Copy.is_editing());
        assert!(EditCommand::Copy.is_read_only_safe());
        assert!(!EditCommand::Paste.is_read_only_safe());
        assert!(EditCommand::Move {
            unit: MoveUnit::NextChar,
            extend: true
        }
        .is_read_only_safe());
    }
}
