//! Cursor type for the document editor.

/// The caret and selection: `position` moves, `anchor` stays fixed while a
/// selection is extended. Both are global document offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub position: usize,
    pub anchor: usize,
}

impl Cursor {
    pub const fn new(anchor: usize, position: usize) -> Self {
        Self { position, anchor }
    }

    /// Create a collapsed cursor (no selection)
    pub const fn collapsed(position: usize) -> Self {
        Self {
            position,
            anchor: position,
        }
    }

    /// Check if there is no selection (anchor == position)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.position
    }

    pub fn has_selection(&self) -> bool {
        !self.is_empty()
    }

    /// Start of the selection (minimum of anchor and position)
    pub fn start(&self) -> usize {
        self.anchor.min(self.position)
    }

    /// End of the selection (maximum of anchor and position)
    pub fn end(&self) -> usize {
        self.anchor.max(self.position)
    }

    /// The selected range as `(start, end)`
    pub fn range(&self) -> (usize, usize) {
        (self.start(), self.end())
    }

    /// Check if selection is reversed (position before anchor)
    pub fn is_reversed(&self) -> bool {
        self.position < self.anchor
    }

    /// Check if an offset is within the selection
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start() && offset < self.end()
    }

    /// Move the position, keeping the anchor unless `extend` is false
    pub fn move_to(&mut self, position: usize, extend: bool) {
        self.position = position;
        if !extend {
            self.anchor = position;
        }
    }

    pub fn collapse_to_start(&mut self) {
        *self = Self::collapsed(self.start());
    }

    pub fn collapse_to_end(&mut self) {
        *self = Self::collapsed(self.end());
    }

    /// Clamp both ends to a document of length `len`
    pub fn clamped(&self, len: usize) -> Self {
        Self {
            position: self.position.min(len),
            anchor: self.anchor.min(len),
        }
    }
}
