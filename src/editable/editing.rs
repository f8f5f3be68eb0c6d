//! Selection-aware insertion and deletion.

use crate::document::TextFormat;

use super::editor::{DocumentEditor, Insertion};
use super::navigation::MoveUnit;

impl DocumentEditor {
    /// Insert at the cursor, replacing any selection. Returns the inserted
    /// length in document units (0 when nothing was inserted).
    pub fn insert(&mut self, text: &str, hint: TextFormat) -> usize {
        if !self.can_edit() {
            return 0;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let position = editor.cursor().position;
            editor.insert_at(position, text, hint)
        })
    }

    /// Insert at `position` (clamped). An active selection is deleted first
    /// and the insertion point shifts with it; the cursor ends up collapsed
    /// after the inserted text.
    pub fn insert_at(&mut self, position: usize, text: &str, hint: TextFormat) -> usize {
        if !self.can_edit() {
            return 0;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let cursor = editor.cursor();
            let position = position.min(editor.len());
            let (start, end) = if cursor.has_selection() {
                let (start, end) = cursor.range();
                // Offsets past the removed range move back with it
                let shifted = if position >= end {
                    position - (end - start)
                } else if position > start {
                    start
                } else {
                    position
                };
                if shifted == start {
                    (start, end)
                } else {
                    if editor.replace_range(start, end, Insertion::Nothing).is_none() {
                        return 0;
                    }
                    (shifted, shifted)
                }
            } else {
                (position, position)
            };
            editor
                .replace_range(start, end, Insertion::Text(text, hint))
                .unwrap_or(0)
        })
    }

    /// Delete the selection, or the code point before the cursor. At a
    /// paragraph start this merges with the previous paragraph.
    pub fn delete_backward(&mut self) -> bool {
        self.delete_toward(|_, position| (position > 0).then(|| (position - 1, position)))
    }

    /// Delete the selection, or the code point after the cursor
    pub fn delete_forward(&mut self) -> bool {
        self.delete_toward(|editor, position| {
            (position < editor.len()).then_some((position, position + 1))
        })
    }

    /// Delete the selection, or back to the previous word start
    pub fn delete_word_backward(&mut self) -> bool {
        self.delete_toward(|editor, position| {
            let target = editor.target_position(MoveUnit::PrevWord, position);
            (target < position).then_some((target, position))
        })
    }

    /// Delete the selection, or forward to the next word start
    pub fn delete_word_forward(&mut self) -> bool {
        self.delete_toward(|editor, position| {
            let target = editor.target_position(MoveUnit::NextWord, position);
            (target > position).then_some((position, target))
        })
    }

    /// Delete the selection, or from the cursor to the end of its line
    pub fn delete_to_end_of_line(&mut self) -> bool {
        self.delete_toward(|editor, position| {
            let target = editor.target_position(MoveUnit::EndOfLine, position);
            (target > position).then_some((position, target))
        })
    }

    /// Delete the selection if there is one
    pub fn delete_selection(&mut self) -> bool {
        if !self.can_edit() || !self.has_selection() {
            return false;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let (start, end) = editor.cursor().range();
            editor.replace_range(start, end, Insertion::Nothing).is_some()
        })
    }

    fn delete_toward(
        &mut self,
        range: impl FnOnce(&DocumentEditor, usize) -> Option<(usize, usize)>,
    ) -> bool {
        if !self.can_edit() {
            return false;
        }
        if self.has_selection() {
            return self.delete_selection();
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let position = editor.cursor().position;
            match range(editor, position) {
                Some((start, end)) => editor.replace_range(start, end, Insertion::Nothing).is_some(),
                None => false,
            }
        })
    }

    /// Replace the whole document content with plain text
    pub fn set_text(&mut self, text: &str) {
        if !self.can_edit() {
            return;
        }
        self.batch(|editor| {
            editor.cancel_composition();
            let len = editor.len();
            editor.replace_range(0, len, Insertion::Text(text, TextFormat::PlainText));
        });
    }
}
