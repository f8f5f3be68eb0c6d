//! Cursor movement and selection for the document editor.

use crate::layout::LayoutMode;
use crate::util::{
    next_grapheme_boundary, next_word_start, prev_grapheme_boundary, prev_word_start, word_at,
};

use super::cursor::Cursor;
use super::editor::DocumentEditor;

/// Unit for [`DocumentEditor::move_relative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveUnit {
    /// One grapheme cluster back
    PrevChar,
    /// One grapheme cluster forward
    NextChar,
    PrevWord,
    NextWord,
    StartOfLine,
    EndOfLine,
    /// The paragraph above, keeping x (`MultiLine`)
    PreviousLine,
    /// The paragraph below, keeping x (`MultiLine`)
    NextLine,
    StartOfDocument,
    EndOfDocument,
    /// Select the word touching the cursor
    WordUnderCursor,
}

impl MoveUnit {
    /// Check if this unit moves toward the start of the document
    pub fn is_backward(self) -> bool {
        matches!(
            self,
            MoveUnit::PrevChar
                | MoveUnit::PrevWord
                | MoveUnit::StartOfLine
                | MoveUnit::PreviousLine
                | MoveUnit::StartOfDocument
        )
    }
}

impl DocumentEditor {
    /// Move the cursor to `position` (clamped). Without `extend` the
    /// selection collapses. A pending composition is committed first.
    pub fn move_to(&mut self, position: usize, extend: bool) {
        if !self.is_bound() {
            return;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let mut cursor = editor.cursor();
            cursor.move_to(position.min(editor.len()), extend);
            editor.set_cursor(cursor);
            tracing::trace!(position = cursor.position, anchor = cursor.anchor, "Moved cursor");
        });
    }

    /// Move by `count` units. Char moves without `extend` collapse an
    /// active selection to its edge in the direction of travel instead.
    pub fn move_relative(&mut self, unit: MoveUnit, extend: bool, count: usize) {
        if !self.is_bound() {
            return;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let mut cursor = editor.cursor();

            if unit == MoveUnit::WordUnderCursor {
                if let Some((start, end)) = editor.word_bounds_at(cursor.position) {
                    editor.set_cursor(Cursor::new(start, end));
                }
                return;
            }

            let is_char = matches!(unit, MoveUnit::PrevChar | MoveUnit::NextChar);
            if is_char && !extend && cursor.has_selection() {
                if unit.is_backward() {
                    cursor.collapse_to_start();
                } else {
                    cursor.collapse_to_end();
                }
                editor.set_cursor(cursor);
                return;
            }

            let mut position = cursor.position;
            for _ in 0..count.max(1) {
                let next = editor.target_position(unit, position);
                if next == position {
                    break;
                }
                position = next;
            }
            cursor.move_to(position, extend);
            editor.set_cursor(cursor);
            tracing::trace!(?unit, extend, position, "Moved cursor");
        });
    }

    /// Where one `unit` of movement from `from` lands
    pub(crate) fn target_position(&self, unit: MoveUnit, from: usize) -> usize {
        let Some(document) = self.document() else {
            return 0;
        };
        let len = document.len();
        let from = from.min(len);
        let Ok((index, local)) = document.locate(from) else {
            return from;
        };
        let paragraph_start = document.paragraph_start(index);
        let paragraph_len = document.paragraph(index).map(|p| p.len()).unwrap_or(0);
        let text = || document.paragraph(index).map(|p| p.text()).unwrap_or_default();
        let multi_line = self.layout_settings().mode == LayoutMode::MultiLine;

        match unit {
            MoveUnit::PrevChar if local > 0 => paragraph_start + prev_grapheme_boundary(&text(), local),
            MoveUnit::PrevChar => from.saturating_sub(1),
            MoveUnit::NextChar if local < paragraph_len => {
                paragraph_start + next_grapheme_boundary(&text(), local)
            }
            MoveUnit::NextChar => (from + 1).min(len),
            MoveUnit::PrevWord if local > 0 => paragraph_start + prev_word_start(&text(), local),
            MoveUnit::PrevWord => from.saturating_sub(1),
            MoveUnit::NextWord if local < paragraph_len => {
                paragraph_start + next_word_start(&text(), local)
            }
            MoveUnit::NextWord => (from + 1).min(len),
            MoveUnit::StartOfLine if multi_line => paragraph_start,
            MoveUnit::EndOfLine if multi_line => paragraph_start + paragraph_len,
            MoveUnit::StartOfLine | MoveUnit::StartOfDocument => 0,
            MoveUnit::EndOfLine | MoveUnit::EndOfDocument => len,
            MoveUnit::PreviousLine | MoveUnit::NextLine if multi_line => {
                self.vertical_target(unit, from).unwrap_or(from)
            }
            MoveUnit::PreviousLine => 0,
            MoveUnit::NextLine => len,
            MoveUnit::WordUnderCursor => from,
        }
    }

    fn vertical_target(&self, unit: MoveUnit, from: usize) -> Option<usize> {
        let layout = self.layout()?;
        let (line, _) = layout.cursor_to_layout(from);
        let target = match unit {
            MoveUnit::PreviousLine if line == 0 => return Some(0),
            MoveUnit::PreviousLine => line - 1,
            _ if line + 1 >= layout.lines.len() => return Some(self.len()),
            _ => line + 1,
        };
        let x = layout.cursor_to_x(from);
        let target_line = layout.lines.get(target)?;
        Some(layout.layout_start(target) + target_line.hit_test(x - target_line.position.x))
    }

    /// Bounds of the word touching `position`, as global offsets
    pub(crate) fn word_bounds_at(&self, position: usize) -> Option<(usize, usize)> {
        let document = self.document()?;
        let (index, local) = document.locate(position.min(document.len())).ok()?;
        let start = document.paragraph_start(index);
        let text = document.paragraph(index)?.text();
        word_at(&text, local).map(|(a, b)| (start + a, start + b))
    }

    /// Select the whole document
    pub fn select_all(&mut self) {
        if !self.is_bound() {
            return;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let len = editor.len();
            editor.set_cursor(Cursor::new(0, len));
        });
    }

    /// Set anchor and position directly (both clamped)
    pub fn set_selection(&mut self, anchor: usize, position: usize) {
        if !self.is_bound() {
            return;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            editor.set_cursor(Cursor::new(anchor, position));
        });
    }

    /// Drop the selection, keeping the cursor where it is
    pub fn clear_selection(&mut self) {
        let position = self.cursor().position;
        self.set_selection(position, position);
    }
}
