//! Edit history (undo/redo) for the document editor.

use crate::document::DocumentFragment;

use super::cursor::Cursor;

/// A single edit operation that can be undone/redone.
///
/// Format changes are recorded as a replace of the range with itself in
/// its new formats.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOperation {
    /// Document offset where the edit occurred
    pub offset: usize,
    /// Content that was removed
    pub deleted: DocumentFragment,
    /// Content that was inserted
    pub inserted: DocumentFragment,
    pub cursor_before: Cursor,
    pub cursor_after: Cursor,
}

impl EditOperation {
    /// Create a replace operation
    pub fn replace(
        offset: usize,
        deleted: DocumentFragment,
        inserted: DocumentFragment,
        cursor_before: Cursor,
        cursor_after: Cursor,
    ) -> Self {
        Self {
            offset,
            deleted,
            inserted,
            cursor_before,
            cursor_after,
        }
    }

    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted: self.inserted.clone(),
            inserted: self.deleted.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
        }
    }

    /// True when neither side carries any content
    pub fn is_noop(&self) -> bool {
        self.deleted == self.inserted && self.cursor_before == self.cursor_after
    }
}

/// Edit history with undo/redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push an operation onto the undo stack (clears redo stack)
    pub fn push(&mut self, op: EditOperation) {
        if op.is_noop() {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(op);

        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop an operation from the undo stack, returning its inverse to apply
    pub fn pop_undo(&mut self) -> Option<EditOperation> {
        let op = self.undo_stack.pop()?;
        let inverse = op.inverse();
        self.redo_stack.push(op);
        Some(inverse)
    }

    /// Pop an operation from the redo stack, returning it to re-apply
    pub fn pop_redo(&mut self) -> Option<EditOperation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push(op.clone());
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
