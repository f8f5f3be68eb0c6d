//! Input method (IME) composition overlay.
//!
//! Preedit text never enters the document: it lives in a [`CompositionState`]
//! anchored at a document offset and is spliced into the layout only. Commit
//! text goes through the normal editing path.

use crate::document::{CharFormat, TextFormat};
use crate::editable::{ChangeOrigin, Cursor, DocumentEditor, Insertion};
use crate::error::EditError;
use crate::layout::{FormatRange, PreeditOverlay};
use crate::util::char_len;

/// Extra information attached to an input method event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMethodAttribute {
    /// Format for `[start, start + length)` of the preedit text
    TextFormat {
        start: usize,
        length: usize,
        format: CharFormat,
    },
    /// Caret position inside the preedit text
    Cursor { position: usize, visible: bool },
    /// Selection relative to the start of the anchor's paragraph
    Selection { start: usize, length: usize },
}

/// One update from the platform input method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputMethodEvent {
    pub preedit: String,
    pub commit: String,
    /// Start of text to replace, relative to the composition anchor
    pub replacement_start: isize,
    pub replacement_length: usize,
    pub attributes: Vec<InputMethodAttribute>,
}

impl InputMethodEvent {
    pub fn preedit(text: impl Into<String>) -> Self {
        Self {
            preedit: text.into(),
            ..Self::default()
        }
    }

    pub fn commit(text: impl Into<String>) -> Self {
        Self {
            commit: text.into(),
            ..Self::default()
        }
    }

    pub fn with_replacement(mut self, start: isize, length: usize) -> Self {
        self.replacement_start = start;
        self.replacement_length = length;
        self
    }

    pub fn with_attribute(mut self, attribute: InputMethodAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Check if the event carries commit text or a replacement
    pub fn changes_document(&self) -> bool {
        !self.commit.is_empty() || self.replacement_length > 0
    }
}

/// An in-progress composition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionState {
    /// Document offset the preedit is shown at
    pub anchor: usize,
    pub preedit_text: String,
    /// Caret offset inside the preedit
    pub cursor_offset: usize,
    pub cursor_visible: bool,
    /// Relative to the preedit text
    pub format_ranges: Vec<FormatRange>,
}

impl CompositionState {
    pub fn new(anchor: usize, preedit_text: String) -> Self {
        let cursor_offset = char_len(&preedit_text);
        Self {
            anchor,
            preedit_text,
            cursor_offset,
            cursor_visible: true,
            format_ranges: Vec::new(),
        }
    }

    /// Preedit length in chars
    pub fn len(&self) -> usize {
        char_len(&self.preedit_text)
    }

    pub fn is_empty(&self) -> bool {
        self.preedit_text.is_empty()
    }

    /// Format ranges translated to absolute document offsets
    pub fn absolute_format_ranges(&self) -> Vec<FormatRange> {
        self.format_ranges
            .iter()
            .map(|r| FormatRange::new(self.anchor + r.start, self.anchor + r.end, r.format))
            .collect()
    }

    pub fn overlay(&self) -> PreeditOverlay {
        PreeditOverlay {
            anchor: self.anchor,
            text: self.preedit_text.clone(),
            format_ranges: self.format_ranges.clone(),
        }
    }
}

impl DocumentEditor {
    pub fn composition(&self) -> Option<&CompositionState> {
        self.composition.as_ref()
    }

    pub fn is_composing(&self) -> bool {
        self.composition.is_some()
    }

    /// Apply an input method event. Returns false when the editor cannot
    /// take input (unbound or read-only).
    pub fn input_method_event(&mut self, event: &InputMethodEvent) -> bool {
        if !self.can_edit() {
            return false;
        }

        let revision = self.document().map(|d| d.revision());
        if self.in_batch() && self.is_composing() && self.batch_start_revision() != revision {
            tracing::debug!(error = %EditError::CompositionConflict, "Committing preedit before input method event");
            self.commit_preedit();
        }

        self.batch_as(ChangeOrigin::User, |editor| {
            let arrives_text = event.changes_document() || !event.preedit.is_empty();
            if arrives_text && !editor.is_composing() && editor.has_selection() {
                let (start, end) = editor.cursor().range();
                editor.replace_range(start, end, Insertion::Nothing);
            }

            let anchor = editor
                .composition
                .as_ref()
                .map(|c| c.anchor)
                .unwrap_or(editor.cursor().position)
                .min(editor.len());

            let anchor = if event.changes_document() {
                let len = editor.len() as isize;
                let start = (anchor as isize + event.replacement_start).clamp(0, len);
                let end = (start + event.replacement_length as isize).min(len);
                tracing::debug!(start, end, commit = %event.commit, "Input method commit");
                match editor.replace_range(
                    start as usize,
                    end as usize,
                    Insertion::Text(&event.commit, TextFormat::PlainText),
                ) {
                    Some(_) => editor.cursor().position,
                    None => anchor,
                }
            } else {
                anchor
            };

            editor.composition = (!event.preedit.is_empty())
                .then(|| CompositionState::new(anchor, event.preedit.clone()));
            editor.bump_composition_generation();

            for attribute in &event.attributes {
                editor.apply_input_method_attribute(anchor, attribute);
            }
            true
        })
    }

    fn apply_input_method_attribute(&mut self, anchor: usize, attribute: &InputMethodAttribute) {
        match *attribute {
            InputMethodAttribute::TextFormat {
                start,
                length,
                format,
            } => {
                if let Some(composition) = self.composition.as_mut() {
                    let len = composition.len();
                    let start = start.min(len);
                    let end = (start + length).min(len);
                    if start < end {
                        composition
                            .format_ranges
                            .push(FormatRange::new(start, end, format));
                    }
                }
            }
            InputMethodAttribute::Cursor { position, visible } => {
                if let Some(composition) = self.composition.as_mut() {
                    composition.cursor_offset = position.min(composition.len());
                    composition.cursor_visible = visible;
                } else {
                    let cursor = Cursor::collapsed(anchor + position);
                    self.set_cursor(cursor);
                }
            }
            InputMethodAttribute::Selection { start, length } => {
                // Not a user selection: nothing is recorded for undo
                let Some(document) = self.document() else {
                    return;
                };
                let paragraph = document.locate(anchor).map(|(idx, _)| idx).unwrap_or(0);
                let base = document.paragraph_start(paragraph);
                let cursor = Cursor::new(base + start, base + start + length);
                self.set_cursor(cursor);
            }
        }
    }

    /// Commit whatever preedit text is pending, as if the input method had
    /// sent it as commit text.
    pub fn commit_preedit(&mut self) -> bool {
        let Some(composition) = self.composition.take() else {
            return false;
        };
        self.batch(|editor| {
            editor.bump_composition_generation();
            if composition.is_empty() {
                return false;
            }
            tracing::debug!(preedit = %composition.preedit_text, anchor = composition.anchor, "Commit preedit");
            editor
                .replace_range(
                    composition.anchor,
                    composition.anchor,
                    Insertion::Text(&composition.preedit_text, TextFormat::PlainText),
                )
                .is_some()
        })
    }

    /// Drop the composition without touching the document
    pub fn cancel_composition(&mut self) -> bool {
        if self.composition.is_none() {
            return false;
        }
        self.batch(|editor| {
            editor.composition = None;
            editor.bump_composition_generation();
        });
        tracing::debug!("Composition cancelled");
        true
    }
}
