//! Edit constraints for the document editor.
//!
//! Constraints define what operations are allowed for a particular editor.

/// Character filter function type
pub type CharFilter = fn(char) -> bool;

/// Constraints that limit what operations are allowed in an editor.
#[derive(Debug, Clone)]
pub struct EditConstraints {
    /// Reject every mutation; navigation, selection and copy still work
    pub read_only: bool,

    /// Allow paragraph breaks in inserted text
    pub allow_multiline: bool,

    /// Enable undo/redo tracking
    pub enable_undo: bool,

    /// Maximum length in document units (None = unlimited)
    pub max_length: Option<usize>,

    /// Character filter (None = all characters allowed)
    /// Returns true if character is allowed
    pub char_filter: Option<CharFilter>,
}

impl Default for EditConstraints {
    fn default() -> Self {
        Self::editor()
    }
}

impl EditConstraints {
    /// Subtitle line editor constraints (everything enabled)
    pub fn editor() -> Self {
        Self {
            read_only: false,
            allow_multiline: true,
            enable_undo: true,
            max_length: None,
            char_filter: None,
        }
    }

    /// One paragraph only; newlines in inserted text are rejected
    pub fn single_paragraph() -> Self {
        Self {
            allow_multiline: false,
            ..Self::editor()
        }
    }

    /// Display-only editor
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            enable_undo: false,
            ..Self::editor()
        }
    }

    /// Check if a character passes the filter (if any)
    pub fn is_char_allowed(&self, ch: char) -> bool {
        match self.char_filter {
            Some(filter) => filter(ch),
            None => true,
        }
    }

    /// Check if every char of `text` is acceptable for insertion
    pub fn is_text_allowed(&self, text: &str) -> bool {
        text.chars().all(|ch| {
            let is_break = matches!(ch, '\n' | '\r' | '\u{2029}');
            if is_break {
                self.allow_multiline
            } else {
                self.is_char_allowed(ch)
            }
        })
    }

    /// Check if inserting text would exceed max length
    pub fn would_exceed_max_length(&self, current_len: usize, insert_len: usize) -> bool {
        if let Some(max) = self.max_length {
            current_len + insert_len > max
        } else {
            false
        }
    }
}
