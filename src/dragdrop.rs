//! Drag and drop between editors.
//!
//! The source side is a [`DragTracker`] fed with pointer positions plus
//! [`DocumentEditor::start_drag`] / [`DocumentEditor::finish_drag`]; the
//! target side is [`DocumentEditor::drag_move`], [`DocumentEditor::drag_leave`]
//! and [`DocumentEditor::drop_payload`].

use std::sync::atomic::{AtomicU64, Ordering};

use crate::clipboard::ClipboardPayload;
use crate::document::CharFormat;
use crate::editable::{Cursor, DocumentEditor, EditorEvent, Insertion};
use crate::geometry::Point;

static NEXT_EDITOR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an editor, used to tell in-control moves from drops
/// coming from elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(u64);

impl EditorId {
    pub(crate) fn next() -> Self {
        EditorId(NEXT_EDITOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropAction {
    #[default]
    Copy,
    Move,
}

/// What travels with a drag: both representations of the selection and
/// where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct DragData {
    pub source: Option<EditorId>,
    /// Source selection `[start, end)` at drag start
    pub range: (usize, usize),
    pub payload: ClipboardPayload,
}

impl DragData {
    /// Data arriving from outside any editor
    pub fn external(payload: ClipboardPayload) -> Self {
        Self {
            source: None,
            range: (0, 0),
            payload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    /// Pressed inside the selection, waiting for the pointer to travel
    Pending { origin: Point },
    Dragging,
}

/// Turns a press inside the selection into a drag once the pointer has
/// moved far enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    threshold: f32,
    state: DragState,
}

impl DragTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: DragState::Idle,
        }
    }

    /// A press inside the selection arms the tracker
    pub fn press(&mut self, point: Point) {
        self.state = DragState::Pending { origin: point };
    }

    /// Feed a pointer move. Returns true exactly once, when the drag starts.
    pub fn update(&mut self, point: Point) -> bool {
        match self.state {
            DragState::Pending { origin } if origin.manhattan_distance(point) >= self.threshold => {
                tracing::trace!(?origin, ?point, "Drag threshold exceeded");
                self.state = DragState::Dragging;
                true
            }
            _ => false,
        }
    }

    /// Pointer released. Returns the press point if the press never became
    /// a drag, so the caller can treat it as a plain click.
    pub fn release(&mut self) -> Option<Point> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        match state {
            DragState::Pending { origin } => Some(origin),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DragState::Pending { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }
}

impl DocumentEditor {
    /// Package the selection for dragging, if there is one
    pub fn start_drag(&self) -> Option<DragData> {
        let fragment = self.selected_fragment()?;
        let range = self.cursor().range();
        tracing::debug!(?range, "Start drag");
        Some(DragData {
            source: Some(self.id()),
            range,
            payload: ClipboardPayload::from_fragment(&fragment),
        })
    }

    /// Source side: the drag ended. A completed move into another control
    /// removes the dragged text here.
    pub fn finish_drag(
        &mut self,
        data: &DragData,
        action: Option<DropAction>,
        target: Option<EditorId>,
    ) -> bool {
        let moved_away = action == Some(DropAction::Move)
            && target.is_some_and(|target| Some(target) != data.source);
        if !moved_away || data.source != Some(self.id()) || !self.can_edit() {
            return false;
        }
        let (start, end) = data.range;
        self.batch(|editor| {
            editor.commit_preedit();
            editor.replace_range(start, end, Insertion::Nothing).is_some()
        })
    }

    /// Target side: the pointer moved over the editor during a drag.
    /// Returns the previewed drop position.
    pub fn drag_move(&mut self, point: Point) -> Option<usize> {
        if !self.can_edit() {
            return None;
        }
        let position = self.hit_test(point)?;
        self.set_drop_preview(Some(position));
        Some(position)
    }

    /// Target side: the drag left the editor without dropping
    pub fn drag_leave(&mut self) {
        self.set_drop_preview(None);
    }

    pub fn drop_preview(&self) -> Option<usize> {
        self.drop_preview
    }

    fn set_drop_preview(&mut self, preview: Option<usize>) {
        if self.drop_preview == preview {
            return;
        }
        let old = self.drop_preview.and_then(|p| self.position_rect(p));
        self.drop_preview = preview;
        let new = preview.and_then(|p| self.position_rect(p));
        if let Some(rect) = [old, new].into_iter().flatten().reduce(|a, b| a.union(&b)) {
            self.push_event(EditorEvent::UpdateNeeded(rect));
        }
    }

    /// Target side: insert dropped content at `position`.
    ///
    /// A move of this editor's own selection onto itself, or onto either of
    /// its edges, is rejected and leaves the document untouched. Any other in-control move removes the
    /// original selection and selects the moved text.
    pub fn drop_payload(&mut self, data: &DragData, position: usize, action: DropAction) -> bool {
        self.set_drop_preview(None);
        if !self.can_edit() {
            return false;
        }
        let in_control = data.source == Some(self.id());
        let (start, end) = self.cursor().range();
        if in_control && action == DropAction::Move && start < end && (start..=end).contains(&position)
        {
            tracing::debug!(position, start, end, "Drop onto own selection ignored");
            return false;
        }
        let Some(fragment) = data.payload.to_fragment(CharFormat::new()) else {
            tracing::debug!("Drop ignored: payload has no usable representation");
            return false;
        };

        self.batch(|editor| {
            editor.commit_preedit();
            let position = position.min(editor.len());
            if in_control && action == DropAction::Move && start != end {
                let removed = end - start;
                let inserted = if position >= end {
                    let target = position - removed;
                    editor.replace_range(start, end, Insertion::Nothing);
                    editor
                        .replace_range(target, target, Insertion::Fragment(&fragment))
                        .map(|n| (target, n))
                } else {
                    let inserted = editor.replace_range(position, position, Insertion::Fragment(&fragment));
                    if let Some(n) = inserted {
                        editor.replace_range(start + n, end + n, Insertion::Nothing);
                    }
                    inserted.map(|n| (position, n))
                };
                match inserted {
                    Some((at, n)) => {
                        editor.set_cursor(Cursor::new(at, at + n));
                        true
                    }
                    None => false,
                }
            } else {
                editor
                    .replace_range(position, position, Insertion::Fragment(&fragment))
                    .is_some()
            }
        })
    }
}
