//! DocumentEditor: the cursor/selection controller that owns a bound
//! document, its cached layout and the change notification queue.

use std::cell::RefCell;
use std::rc::Rc;

use crate::composition::CompositionState;
use crate::document::{CharFormat, Document, DocumentFragment, TextFormat};
use crate::dragdrop::EditorId;
use crate::geometry::{Point, Rect};
use crate::layout::{
    FontMetrics, LayoutDirection, LayoutMode, LayoutSettings, MonospaceMetrics, TextLayout,
};

use super::constraints::EditConstraints;
use super::cursor::Cursor;
use super::events::{BatchSnapshot, ChangeOrigin, EditorEvent};
use super::history::{EditHistory, EditOperation};

/// Content for [`DocumentEditor::replace_range`]
#[derive(Debug, Clone, Copy)]
pub(crate) enum Insertion<'a> {
    Text(&'a str, TextFormat),
    Fragment(&'a DocumentFragment),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    bind_generation: u64,
    revision: u64,
    composition_generation: u64,
    settings_generation: u64,
}

#[derive(Debug)]
struct CachedLayout {
    key: LayoutKey,
    layout: Rc<TextLayout>,
}

/// Cursor, selection and editing state for one bound [`Document`].
///
/// Every public operation runs inside a notification batch: nested
/// operations coalesce, and the events describing the net change are queued
/// once the outermost batch closes. Drain them with
/// [`take_events`](Self::take_events).
#[derive(Debug)]
pub struct DocumentEditor {
    id: EditorId,
    document: Option<Document>,
    cursor: Cursor,
    pub constraints: EditConstraints,
    history: EditHistory,
    /// Format for the next typed text when there is no selection
    pub(crate) typing_format: Option<CharFormat>,
    pub(crate) composition: Option<CompositionState>,
    /// Live drop position while something is dragged over the editor
    pub(crate) drop_preview: Option<usize>,
    composition_generation: u64,
    settings: LayoutSettings,
    settings_generation: u64,
    cursor_width: f32,
    metrics: Box<dyn FontMetrics>,
    layout_cache: RefCell<Option<CachedLayout>>,
    bind_generation: u64,
    events: Vec<EditorEvent>,
    batch_depth: usize,
    batch_snapshot: Option<BatchSnapshot>,
}

impl Default for DocumentEditor {
    fn default() -> Self {
        Self::new(EditConstraints::default())
    }
}

impl DocumentEditor {
    /// Create an editor with no document bound
    pub fn new(constraints: EditConstraints) -> Self {
        Self {
            id: EditorId::next(),
            document: None,
            cursor: Cursor::default(),
            constraints,
            history: EditHistory::new(),
            typing_format: None,
            composition: None,
            drop_preview: None,
            composition_generation: 0,
            settings: LayoutSettings::default(),
            settings_generation: 0,
            cursor_width: 1.0,
            metrics: Box::new(MonospaceMetrics::default()),
            layout_cache: RefCell::new(None),
            bind_generation: 0,
            events: Vec::new(),
            batch_depth: 0,
            batch_snapshot: None,
        }
    }

    /// Create an editor bound to `document`
    pub fn with_document(document: Document, constraints: EditConstraints) -> Self {
        let mut editor = Self::new(constraints);
        editor.bind_document(Some(document));
        editor.events.clear();
        editor
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    // === Binding ===

    /// Attach `document` (or detach with `None`), returning the previously
    /// bound one. Any composition is discarded, the cursor resets to the
    /// start and the undo history is cleared.
    pub fn bind_document(&mut self, document: Option<Document>) -> Option<Document> {
        self.batch(|editor| {
            if editor.composition.take().is_some() {
                editor.composition_generation += 1;
            }
            let previous = std::mem::replace(&mut editor.document, document);
            editor.bind_generation += 1;
            editor.cursor = Cursor::default();
            editor.typing_format = None;
            editor.drop_preview = None;
            editor.history.clear();
            editor.layout_cache.replace(None);
            tracing::debug!(
                bound = editor.document.is_some(),
                len = editor.document.as_ref().map(Document::len),
                "Bound document"
            );
            previous
        })
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.document.is_some()
    }

    /// Mutate the bound document directly. The cursor is re-validated
    /// against the new length afterwards and the history is cleared, since
    /// recorded offsets may no longer apply.
    pub fn with_document_mut<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        self.batch(|editor| {
            let document = editor.document.as_mut()?;
            let revision = document.revision();
            let result = f(document);
            let len = document.len();
            if document.revision() != revision {
                editor.history.clear();
            }
            editor.cursor = editor.cursor.clamped(len);
            Some(result)
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.constraints.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.constraints.read_only = read_only;
    }

    // === Notification batching ===

    /// Run `f` as one programmatic logical operation
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_as(ChangeOrigin::Programmatic, f)
    }

    /// Run `f` as one logical operation. The outermost batch decides the
    /// origin reported for text changes.
    pub fn batch_as<R>(&mut self, origin: ChangeOrigin, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_batch(origin);
        let result = f(self);
        self.end_batch();
        result
    }

    /// Open a batch; every call must be paired with [`end_batch`](Self::end_batch)
    pub(crate) fn begin_batch(&mut self, origin: ChangeOrigin) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(self.snapshot(origin));
        }
        self.batch_depth += 1;
    }

    pub(crate) fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            if let Some(before) = self.batch_snapshot.take() {
                self.flush_events(before);
            }
        }
    }

    pub(crate) fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Revision of the document when the outermost open batch started
    pub(crate) fn batch_start_revision(&self) -> Option<u64> {
        self.batch_snapshot.as_ref().and_then(|s| s.revision)
    }

    fn snapshot(&self, origin: ChangeOrigin) -> BatchSnapshot {
        let layout = self.layout();
        let selection = self.cursor.range();
        BatchSnapshot {
            revision: self.document.as_ref().map(Document::revision),
            bind_generation: self.bind_generation,
            display_text: self.display_text(),
            position: self.cursor.position,
            selection,
            format: self.current_format(),
            cursor_rect: self.cursor_rect(),
            bounds: layout.as_ref().map(|l| Rect::new(0.0, 0.0, l.width, l.height)),
            selection_bounds: layout.as_ref().and_then(|l| {
                l.selection_rects(selection.0, selection.1)
                    .into_iter()
                    .reduce(|a, b| a.union(&b))
            }),
            origin,
        }
    }

    fn flush_events(&mut self, before: BatchSnapshot) {
        let after = self.snapshot(before.origin);
        let rebound = before.bind_generation != after.bind_generation;
        let text_changed = rebound || before.revision != after.revision;

        if rebound {
            self.events.push(EditorEvent::DocumentReplaced);
        }
        if before.display_text != after.display_text {
            self.events
                .push(EditorEvent::DisplayTextChanged(after.display_text.clone()));
        }
        if text_changed {
            let text = self.text();
            if before.origin == ChangeOrigin::User && !rebound {
                self.events.push(EditorEvent::TextChanged(text.clone()));
                self.events.push(EditorEvent::TextEdited(text));
            } else {
                self.events.push(EditorEvent::TextChanged(text));
            }
        }
        if before.position != after.position {
            self.events.push(EditorEvent::CursorPositionChanged {
                old: before.position,
                new: after.position,
            });
        }
        let both_empty = before.selection.0 == before.selection.1
            && after.selection.0 == after.selection.1;
        if before.selection != after.selection && !both_empty {
            self.events.push(EditorEvent::SelectionChanged);
        }
        if before.format != after.format {
            if let Some(format) = after.format {
                self.events.push(EditorEvent::FormatChanged(format));
            }
        }

        let dirty = if text_changed || before.display_text != after.display_text {
            [before.bounds, after.bounds]
                .into_iter()
                .flatten()
                .reduce(|a, b| a.union(&b))
        } else {
            [
                before.cursor_rect,
                after.cursor_rect,
                before.selection_bounds,
                after.selection_bounds,
            ]
            .into_iter()
            .flatten()
            .reduce(|a, b| a.union(&b))
            .filter(|_| before.selection != after.selection || before.cursor_rect != after.cursor_rect)
        };
        if let Some(rect) = dirty {
            self.events.push(EditorEvent::UpdateNeeded(rect));
        }
    }

    /// Queue an event outside of the batch diff (blink ticks, drag previews)
    pub(crate) fn push_event(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    /// Drain every queued notification
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[EditorEvent] {
        &self.events
    }

    // === Layout ===

    pub fn layout_settings(&self) -> LayoutSettings {
        self.settings
    }

    fn update_settings(&mut self, f: impl FnOnce(&mut LayoutSettings)) {
        let mut settings = self.settings;
        f(&mut settings);
        if settings != self.settings {
            self.batch(|editor| {
                editor.settings = settings;
                editor.settings_generation += 1;
            });
        }
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.update_settings(|s| s.mode = mode);
    }

    pub fn set_direction(&mut self, direction: LayoutDirection) {
        self.update_settings(|s| s.direction = direction);
    }

    pub fn set_separator_width(&mut self, width: f32) {
        self.update_settings(|s| s.separator_width = width);
    }

    /// Resize; a `SingleLine` layout never depends on the viewport
    pub fn set_viewport_width(&mut self, width: f32) {
        if self.settings.mode == LayoutMode::SingleLine {
            self.settings.viewport_width = width;
            return;
        }
        self.update_settings(|s| s.viewport_width = width);
    }

    pub fn set_cursor_width(&mut self, width: f32) {
        self.cursor_width = width;
    }

    pub fn cursor_width(&self) -> f32 {
        self.cursor_width
    }

    /// Replace the font metrics (a font change)
    pub fn set_metrics(&mut self, metrics: Box<dyn FontMetrics>) {
        self.batch(|editor| {
            editor.metrics = metrics;
            editor.settings_generation += 1;
        });
    }

    pub(crate) fn bump_composition_generation(&mut self) {
        self.composition_generation += 1;
    }

    /// The current layout, rebuilt only when the document, composition or
    /// layout settings changed since it was last built.
    pub fn layout(&self) -> Option<Rc<TextLayout>> {
        let document = self.document.as_ref()?;
        let key = LayoutKey {
            bind_generation: self.bind_generation,
            revision: document.revision(),
            composition_generation: self.composition_generation,
            settings_generation: self.settings_generation,
        };
        let mut cache = self.layout_cache.borrow_mut();
        if let Some(cached) = cache.as_ref() {
            if cached.key == key {
                return Some(Rc::clone(&cached.layout));
            }
        }
        let overlay = self.composition.as_ref().map(CompositionState::overlay);
        let layout = Rc::new(TextLayout::build(
            document,
            &self.settings,
            overlay.as_ref(),
            self.metrics.as_ref(),
        ));
        *cache = Some(CachedLayout {
            key,
            layout: Rc::clone(&layout),
        });
        Some(layout)
    }

    // === Queries ===

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Length of the bound document (0 when unbound)
    pub fn len(&self) -> usize {
        self.document.as_ref().map(Document::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document text with `'\n'` between paragraphs, empty when unbound
    pub fn text(&self) -> String {
        self.document.as_ref().map(Document::text).unwrap_or_default()
    }

    /// Text as displayed: the document with any preedit spliced in
    pub fn display_text(&self) -> String {
        let mut text = self.text();
        if let Some(composition) = &self.composition {
            let byte_idx = crate::util::char_to_byte_idx(&text, composition.anchor);
            text.insert_str(byte_idx, &composition.preedit_text);
        }
        text
    }

    pub fn selected_text(&self) -> String {
        let (start, end) = self.cursor.range();
        self.document
            .as_ref()
            .and_then(|doc| doc.slice(start, end).ok())
            .map(|fragment| fragment.text())
            .unwrap_or_default()
    }

    /// The selection as a detached fragment, if any
    pub fn selected_fragment(&self) -> Option<DocumentFragment> {
        if self.cursor.is_empty() {
            return None;
        }
        let (start, end) = self.cursor.range();
        self.document.as_ref()?.slice(start, end).ok()
    }

    pub fn has_selection(&self) -> bool {
        self.cursor.has_selection()
    }

    pub fn cursor_position(&self) -> Option<usize> {
        self.document.as_ref().map(|_| self.cursor.position)
    }

    pub fn anchor(&self) -> Option<usize> {
        self.document.as_ref().map(|_| self.cursor.anchor)
    }

    pub fn selection_start(&self) -> Option<usize> {
        self.document.as_ref().map(|_| self.cursor.start())
    }

    pub fn selection_end(&self) -> Option<usize> {
        self.document.as_ref().map(|_| self.cursor.end())
    }

    /// Caret rectangle; inside a composition it follows the preedit caret
    pub fn cursor_rect(&self) -> Option<Rect> {
        let layout = self.layout()?;
        if let Some(composition) = &self.composition {
            if let Some(rect) =
                layout.preedit_cursor_rect(composition.cursor_offset, self.cursor_width)
            {
                return Some(rect);
            }
        }
        Some(layout.cursor_rect(self.cursor.position, self.cursor_width))
    }

    pub fn anchor_rect(&self) -> Option<Rect> {
        let layout = self.layout()?;
        Some(layout.cursor_rect(self.cursor.anchor, self.cursor_width))
    }

    /// Rectangle of an arbitrary offset (clamped)
    pub fn position_rect(&self, position: usize) -> Option<Rect> {
        let layout = self.layout()?;
        Some(layout.cursor_rect(position.min(self.len()), self.cursor_width))
    }

    pub fn x_to_position(&self, x: f32) -> Option<usize> {
        Some(self.layout()?.x_to_position(x))
    }

    pub fn hit_test(&self, point: Point) -> Option<usize> {
        Some(self.layout()?.hit_test(point))
    }

    /// Selection highlight rectangles
    pub fn selection_rects(&self) -> Vec<Rect> {
        let (start, end) = self.cursor.range();
        self.layout()
            .map(|layout| layout.selection_rects(start, end))
            .unwrap_or_default()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of steps available to `(undo, redo)`
    pub fn history_depth(&self) -> (usize, usize) {
        (self.history.undo_count(), self.history.redo_count())
    }

    // === Internal mutation primitives ===

    /// Set the cursor (clamped). A moved position drops the typing format.
    pub(crate) fn set_cursor(&mut self, cursor: Cursor) {
        let cursor = cursor.clamped(self.len());
        if cursor.position != self.cursor.position {
            self.typing_format = None;
        }
        self.cursor = cursor;
    }

    /// Whether mutations are currently possible, logging why not
    pub(crate) fn can_edit(&self) -> bool {
        if self.document.is_none() {
            tracing::trace!("Edit ignored: no document bound");
            return false;
        }
        if self.constraints.read_only {
            tracing::debug!("Edit rejected: editor is read-only");
            return false;
        }
        true
    }

    /// Replace `[start, end)` (clamped and ordered) with `content`, record
    /// it for undo and leave the cursor collapsed after the inserted text.
    ///
    /// Returns the inserted length, or `None` when nothing was changed.
    pub(crate) fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        content: Insertion<'_>,
    ) -> Option<usize> {
        if !self.can_edit() {
            return None;
        }
        let cursor_before = self.cursor;
        let typing = self.typing_format;
        let document = self.document.as_mut()?;
        let len = document.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));

        let base = typing.unwrap_or_else(|| document.query_format(start));
        let fragment = match content {
            Insertion::Text(text, hint) if hint.is_rich(text) => {
                DocumentFragment::from_markup(text, base)
            }
            Insertion::Text(text, _) => DocumentFragment::from_plain_text(text, base),
            Insertion::Fragment(fragment) => fragment.clone(),
            Insertion::Nothing => DocumentFragment::default(),
        };

        if !self.constraints.is_text_allowed(&fragment.text()) {
            tracing::debug!("Insertion rejected by edit constraints");
            return None;
        }
        if self
            .constraints
            .would_exceed_max_length(len - (end - start), fragment.len())
        {
            tracing::debug!(max = ?self.constraints.max_length, "Insertion would exceed max length");
            return None;
        }
        if start == end && fragment.is_empty() {
            return Some(0);
        }

        let deleted = match document.remove_range(start, end) {
            Ok(deleted) => deleted,
            Err(err) => {
                tracing::warn!(%err, start, end, "Failed to remove range");
                return None;
            }
        };
        let inserted_len = match document.insert_fragment(start, &fragment) {
            Ok(n) => n,
            Err(err) => {
                tracing::warn!(%err, start, "Failed to insert fragment");
                0
            }
        };
        let inserted = document
            .slice(start, start + inserted_len)
            .unwrap_or_default();

        if let Some(composition) = self.composition.as_mut() {
            let anchor = composition.anchor;
            composition.anchor = if anchor >= end {
                anchor - (end - start) + inserted_len
            } else if anchor > start {
                start + inserted_len
            } else {
                anchor
            };
        }

        self.typing_format = None;
        self.cursor = Cursor::collapsed(start + inserted_len);
        if self.constraints.enable_undo {
            self.history.push(EditOperation::replace(
                start,
                deleted,
                inserted,
                cursor_before,
                self.cursor,
            ));
        }
        tracing::debug!(start, end, inserted_len, "Replaced range");
        Some(inserted_len)
    }

    /// Rewrite formats over `[start, end)` with undo support
    pub(crate) fn update_range_format(
        &mut self,
        start: usize,
        end: usize,
        f: impl FnMut(&mut CharFormat),
    ) -> bool {
        if !self.can_edit() || start >= end {
            return false;
        }
        let cursor = self.cursor;
        let Some(document) = self.document.as_mut() else {
            return false;
        };
        let end = end.min(document.len());
        let Ok(before) = document.slice(start, end) else {
            return false;
        };
        if let Err(err) = document.update_format(start, end, f) {
            tracing::warn!(%err, start, end, "Failed to update format");
            return false;
        }
        let after = document.slice(start, end).unwrap_or_default();
        if self.constraints.enable_undo {
            self.history
                .push(EditOperation::replace(start, before, after, cursor, cursor));
        }
        true
    }

    /// Apply a history operation to the document
    fn apply_operation(&mut self, op: &EditOperation) -> bool {
        let Some(document) = self.document.as_mut() else {
            return false;
        };
        let end = op.offset + op.deleted.len();
        if let Err(err) = document.remove_range(op.offset, end) {
            tracing::warn!(%err, "History operation no longer applies");
            return false;
        }
        if let Err(err) = document.insert_fragment(op.offset, &op.inserted) {
            tracing::warn!(%err, "History operation no longer applies");
            return false;
        }
        self.typing_format = None;
        self.cursor = op.cursor_after.clamped(document.len());
        true
    }

    /// Undo the last edit
    pub fn undo(&mut self) -> bool {
        if !self.can_edit() || !self.constraints.enable_undo {
            return false;
        }
        self.batch(|editor| {
            editor.cancel_composition();
            let Some(op) = editor.history.pop_undo() else {
                return false;
            };
            tracing::debug!(offset = op.offset, "Undo");
            editor.apply_operation(&op)
        })
    }

    /// Redo the last undone edit
    pub fn redo(&mut self) -> bool {
        if !self.can_edit() || !self.constraints.enable_undo {
            return false;
        }
        self.batch(|editor| {
            editor.cancel_composition();
            let Some(op) = editor.history.pop_redo() else {
                return false;
            };
            tracing::debug!(offset = op.offset, "Redo");
            editor.apply_operation(&op)
        })
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Cap the number of undo steps; drops the current history
    pub fn set_history_limit(&mut self, max_size: usize) {
        self.history = EditHistory::with_max_size(max_size);
    }
}
