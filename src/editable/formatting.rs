//! Character format toggling and text color.

use crate::document::{CharFormat, Color, FormatAttribute};

use super::editor::DocumentEditor;

impl DocumentEditor {
    /// Format at the cursor: the pending typing format, else the format of
    /// the first selected char, else the format typing would pick up.
    pub fn current_format(&self) -> Option<CharFormat> {
        let document = self.document()?;
        let cursor = self.cursor();
        if cursor.has_selection() {
            return Some(document.format_of_char(cursor.start()));
        }
        Some(
            self.typing_format
                .unwrap_or_else(|| document.query_format(cursor.position)),
        )
    }

    /// Flip one attribute relative to the format at the cursor (or at the
    /// selection start), applying it to the selection or to the format of
    /// the next typed text.
    ///
    /// Only that single position is inspected, so a selection of mixed
    /// formats becomes uniformly the inverse of its first char.
    pub fn toggle_format(&mut self, attribute: FormatAttribute) {
        let Some(current) = self.current_format() else {
            return;
        };
        let toggled = current.toggled(attribute);
        tracing::debug!(?attribute, on = toggled.get(attribute), "Toggle format");
        self.apply_format(toggled);
    }

    /// Set the foreground color; a fully transparent color removes the
    /// override instead.
    pub fn set_text_color(&mut self, color: Color) {
        if !self.is_bound() || self.is_read_only() {
            return;
        }
        let foreground = (!color.is_transparent()).then_some(color);
        self.batch(|editor| {
            editor.commit_preedit();
            let cursor = editor.cursor();
            if cursor.has_selection() {
                let (start, end) = cursor.range();
                editor.update_range_format(start, end, |f| f.foreground = foreground);
            } else if let Some(mut typing) = editor.current_format() {
                typing.foreground = foreground;
                editor.typing_format = Some(typing.normalized());
            }
        });
    }

    /// Merge `format` onto the selection, or onto the typing format
    pub fn merge_format(&mut self, format: CharFormat) {
        self.apply_format(format);
    }

    fn apply_format(&mut self, format: CharFormat) {
        if !self.is_bound() || self.is_read_only() {
            return;
        }
        self.batch(|editor| {
            editor.commit_preedit();
            let cursor = editor.cursor();
            if cursor.has_selection() {
                let (start, end) = cursor.range();
                editor.update_range_format(start, end, |f| f.merge(&format));
            } else if let Some(current) = editor.current_format() {
                editor.typing_format = Some(current.merged(&format).normalized());
            }
        });
    }
}
