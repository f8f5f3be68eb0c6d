//! Interaction state machine: keyboard, mouse, focus, blinking and
//! completion on top of a [`DocumentEditor`].
//!
//! Input is handled in two steps. A key press is first classified into an
//! [`EditCommand`] (see [`classify`]), then [`LineEditor::dispatch`] runs the
//! command against the editor. Both steps can be driven separately, which
//! keeps the key table testable without an editor.
//!
//! # Example
//!
//! ```
//! use richline::document::Document;
//! use richline::editable::{DocumentEditor, EditConstraints};
//! use richline::interaction::{KeyEvent, LineEditor};
//! use richline::theme::PlatformTheme;
//!
//! let editor = DocumentEditor::with_document(Document::new(), EditConstraints::editor());
//! let mut line = LineEditor::new(editor, PlatformTheme::default());
//! line.handle_key(&KeyEvent::char('h'));
//! line.handle_key(&KeyEvent::char('i'));
//! assert_eq!(line.editor().text(), "hi");
//! ```

mod blink;
mod command;
mod completion;
mod keys;

pub use blink::BlinkTimer;
pub use command::{classify, is_acceptable_input, EditCommand};
pub use completion::{Completer, CompletionMode, Direction, ListCompleter};
pub use keys::{KeyCode, KeyEvent, Modifiers};

use crate::clipboard::{ClipboardKind, ClipboardService, MemoryClipboard};
use crate::composition::InputMethodEvent;
use crate::document::TextFormat;
use crate::dragdrop::{DragData, DragTracker, DropAction, EditorId};
use crate::editable::{ChangeOrigin, DocumentEditor, EditorEvent, MoveUnit};
use crate::geometry::Point;
use crate::theme::PlatformTheme;
use crate::tracing::CursorSnapshot;
use crate::util::char_len;

/// A pending inline suggestion: the selected suffix `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InlineSuggestion {
    start: usize,
    end: usize,
}

/// One interactive line editor control
#[derive(Debug)]
pub struct LineEditor {
    editor: DocumentEditor,
    theme: PlatformTheme,
    clipboard: Box<dyn ClipboardService>,
    completer: Option<Box<dyn Completer>>,
    completion_mode: CompletionMode,
    suggestion: Option<InlineSuggestion>,
    blink: BlinkTimer,
    drag: DragTracker,
    /// Mouse button held after a press that did not arm a drag
    selecting: bool,
    focused: bool,
}

impl LineEditor {
    /// Wrap `editor` with an in-memory clipboard
    pub fn new(editor: DocumentEditor, theme: PlatformTheme) -> Self {
        Self {
            editor,
            theme,
            clipboard: Box::new(MemoryClipboard::new()),
            completer: None,
            completion_mode: CompletionMode::default(),
            suggestion: None,
            blink: BlinkTimer::new(theme.blink_interval()),
            drag: DragTracker::new(theme.start_drag_distance),
            selecting: false,
            focused: false,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardService>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn editor(&self) -> &DocumentEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut DocumentEditor {
        &mut self.editor
    }

    pub fn into_editor(self) -> DocumentEditor {
        self.editor
    }

    pub fn id(&self) -> EditorId {
        self.editor.id()
    }

    pub fn theme(&self) -> &PlatformTheme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: PlatformTheme) {
        self.theme = theme;
        self.drag = DragTracker::new(theme.start_drag_distance);
        self.blink.set_interval(theme.blink_interval());
        self.refresh_blink();
    }

    pub fn clipboard(&self) -> &dyn ClipboardService {
        self.clipboard.as_ref()
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn ClipboardService {
        self.clipboard.as_mut()
    }

    pub fn set_completer(&mut self, completer: Option<Box<dyn Completer>>, mode: CompletionMode) {
        self.completer = completer;
        self.completion_mode = mode;
        self.suggestion = None;
    }

    pub fn completion_mode(&self) -> CompletionMode {
        self.completion_mode
    }

    /// Whether an inline suggestion is currently shown
    pub fn has_suggestion(&self) -> bool {
        self.suggestion.is_some()
    }

    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.editor.take_events()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.editor.set_read_only(read_only);
        self.refresh_blink();
    }

    // === Keyboard ===

    /// Classify and run a key press. Returns false if the key was not used.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(command) = classify(event, self.theme.keyboard_scheme) else {
            tracing::trace!(key = %event, "Key not handled");
            return false;
        };
        self.dispatch(command)
    }

    /// Run one command as a single user-originated operation
    pub fn dispatch(&mut self, command: EditCommand) -> bool {
        if self.editor.is_read_only() && !command.is_read_only_safe() {
            tracing::debug!(?command, "Command rejected: editor is read-only");
            return false;
        }
        let before = tracing::enabled!(tracing::Level::TRACE)
            .then(|| CursorSnapshot::from_editor(&self.editor));
        tracing::trace!(?command, "Dispatch");
        self.editor.begin_batch(ChangeOrigin::User);
        let handled = self.run(command);
        self.editor.end_batch();
        if let Some(change) =
            before.and_then(|before| before.diff(&CursorSnapshot::from_editor(&self.editor)))
        {
            tracing::trace!(%change, "Cursor changed");
        }
        if handled {
            self.blink.reset();
        }
        handled
    }

    fn run(&mut self, command: EditCommand) -> bool {
        let inline = self.completion_mode == CompletionMode::Inline && self.completer.is_some();
        match command {
            EditCommand::Move {
                unit: unit @ (MoveUnit::PreviousLine | MoveUnit::NextLine),
                extend: false,
            } if inline && self.suggestion.is_some() => {
                let direction = if unit == MoveUnit::PreviousLine {
                    Direction::Previous
                } else {
                    Direction::Next
                };
                self.cycle_suggestion(direction)
            }
            EditCommand::Move { unit, extend } => {
                self.suggestion = None;
                self.user_batch(|editor| editor.move_relative(unit, extend, 1));
                if extend {
                    self.update_primary_selection();
                }
                true
            }
            EditCommand::SelectAll => {
                self.user_batch(DocumentEditor::select_all);
                self.update_primary_selection();
                true
            }
            EditCommand::Insert(text) => {
                self.suggestion = None;
                let inserted = self.user_batch(|editor| editor.insert(&text, TextFormat::PlainText));
                if inserted > 0 {
                    self.complete_after_edit(true);
                }
                inserted > 0
            }
            EditCommand::InsertParagraphBreak => {
                self.suggestion = None;
                self.text_batch(|editor| editor.insert("\n", TextFormat::PlainText)) > 0
            }
            EditCommand::DeleteBackward => self.delete_with(DocumentEditor::delete_backward),
            EditCommand::DeleteForward => self.delete_with(DocumentEditor::delete_forward),
            EditCommand::DeleteWordBackward => {
                self.delete_with(DocumentEditor::delete_word_backward)
            }
            EditCommand::DeleteWordForward => self.delete_with(DocumentEditor::delete_word_forward),
            EditCommand::DeleteToEndOfLine => {
                self.delete_with(DocumentEditor::delete_to_end_of_line)
            }
            EditCommand::Copy => self.editor.copy(self.clipboard.as_mut()),
            EditCommand::Cut => {
                self.suggestion = None;
                let before = self.text_before_edit();
                let clipboard = self.clipboard.as_mut();
                let cut = self
                    .editor
                    .batch_as(ChangeOrigin::User, |editor| editor.cut(clipboard));
                self.complete_if_changed(before);
                cut
            }
            EditCommand::Paste => self.paste_from(ClipboardKind::Clipboard),
            EditCommand::Undo => {
                self.suggestion = None;
                self.text_batch(DocumentEditor::undo)
            }
            EditCommand::Redo => {
                self.suggestion = None;
                self.text_batch(DocumentEditor::redo)
            }
            EditCommand::ToggleFormat(attribute) => {
                self.user_batch(|editor| editor.toggle_format(attribute));
                true
            }
            EditCommand::AcceptCompletion => self.accept_suggestion(),
        }
    }

    fn user_batch<R>(&mut self, f: impl FnOnce(&mut DocumentEditor) -> R) -> R {
        self.editor.batch_as(ChangeOrigin::User, f)
    }

    /// A user batch that hands the new prefix to the completer if the text
    /// changed
    fn text_batch<R>(&mut self, f: impl FnOnce(&mut DocumentEditor) -> R) -> R {
        let before = self.text_before_edit();
        let result = self.user_batch(f);
        self.complete_if_changed(before);
        result
    }

    /// Text to compare against after an edit; `None` without a completer
    fn text_before_edit(&self) -> Option<String> {
        self.completer.as_ref().map(|_| self.editor.text())
    }

    fn complete_if_changed(&mut self, before: Option<String>) {
        if before.is_some_and(|text| text != self.editor.text()) {
            self.complete_after_edit(false);
        }
    }

    fn delete_with(&mut self, f: fn(&mut DocumentEditor) -> bool) -> bool {
        self.suggestion = None;
        self.text_batch(f)
    }

    fn paste_from(&mut self, kind: ClipboardKind) -> bool {
        self.suggestion = None;
        let before = self.text_before_edit();
        let clipboard = self.clipboard.as_ref();
        let pasted = match self
            .editor
            .batch_as(ChangeOrigin::User, |editor| editor.paste_from(clipboard, kind))
        {
            Ok(inserted) => inserted > 0,
            Err(err) => {
                tracing::debug!(%err, ?kind, "Paste ignored");
                false
            }
        };
        self.complete_if_changed(before);
        pasted
    }

    /// Mirror a fresh selection into the primary selection clipboard
    fn update_primary_selection(&mut self) {
        if self.theme.supports_selection_clipboard && self.editor.has_selection() {
            self.editor
                .copy_to(self.clipboard.as_mut(), ClipboardKind::Selection);
        }
    }

    // === Completion ===

    /// Hand the completion prefix to the completer after a user edit
    fn complete_after_edit(&mut self, typed: bool) {
        let Some(completer) = self.completer.as_mut() else {
            return;
        };
        let cursor = self.editor.cursor().position;
        match self.completion_mode {
            CompletionMode::Popup => {
                let prefix = self
                    .editor
                    .word_bounds_at(cursor)
                    .filter(|(start, _)| *start < cursor)
                    .and_then(|(start, _)| {
                        self.editor.document()?.slice(start, cursor).ok()
                    })
                    .map(|fragment| fragment.text())
                    .unwrap_or_default();
                completer.set_prefix(&prefix);
            }
            CompletionMode::Inline => {
                completer.set_prefix(&self.editor.text());
                // Deleting must not bring the suffix straight back
                if typed && cursor == self.editor.len() {
                    self.show_suggestion(cursor);
                }
            }
        }
    }

    /// Append the current candidate's remaining suffix at `typed_end`,
    /// selected so that further typing replaces it
    fn show_suggestion(&mut self, typed_end: usize) -> bool {
        let Some(candidate) = self.completer.as_ref().and_then(|c| c.current_candidate()) else {
            return false;
        };
        let typed = self
            .editor
            .document()
            .and_then(|doc| doc.slice(0, typed_end).ok())
            .map(|fragment| fragment.text())
            .unwrap_or_default();
        let Some(suffix) = completion_suffix(&typed, &candidate) else {
            return false;
        };
        if suffix.is_empty() {
            return false;
        }
        let inserted = self.user_batch(|editor| {
            let inserted = editor.insert_at(typed_end, suffix, TextFormat::PlainText);
            editor.set_selection(typed_end, typed_end + inserted);
            inserted
        });
        if inserted == 0 {
            return false;
        }
        tracing::debug!(%candidate, "Showing inline completion");
        self.suggestion = Some(InlineSuggestion {
            start: typed_end,
            end: typed_end + inserted,
        });
        true
    }

    /// The suggestion, if the editor still shows it untouched
    fn live_suggestion(&self) -> Option<InlineSuggestion> {
        let suggestion = self.suggestion?;
        let cursor = self.editor.cursor();
        (cursor.range() == (suggestion.start, suggestion.end)).then_some(suggestion)
    }

    fn cycle_suggestion(&mut self, direction: Direction) -> bool {
        let Some(suggestion) = self.live_suggestion() else {
            self.suggestion = None;
            return false;
        };
        let advanced = self
            .completer
            .as_mut()
            .is_some_and(|completer| completer.advance(direction));
        if !advanced {
            return false;
        }
        self.user_batch(|editor| editor.delete_selection());
        self.suggestion = None;
        self.show_suggestion(suggestion.start);
        true
    }

    fn accept_suggestion(&mut self) -> bool {
        let Some(suggestion) = self.live_suggestion() else {
            return false;
        };
        self.suggestion = None;
        tracing::debug!(end = suggestion.end, "Accepted inline completion");
        self.user_batch(|editor| editor.move_to(suggestion.end, false));
        true
    }

    // === Input method ===

    pub fn input_method_event(&mut self, event: &InputMethodEvent) -> bool {
        if event.changes_document() {
            self.suggestion = None;
        }
        let before = self.text_before_edit();
        let handled = self.editor.input_method_event(event);
        self.complete_if_changed(before);
        if handled {
            self.blink.reset();
        }
        handled
    }

    // === Mouse ===

    /// Button press. Shift extends the selection; a press inside the
    /// selection may become a drag.
    pub fn mouse_press(&mut self, point: Point, mods: Modifiers) {
        let Some(position) = self.editor.hit_test(point) else {
            return;
        };
        self.suggestion = None;
        let (start, end) = self.editor.cursor().range();
        if !mods.shift() && start < end && (start..end).contains(&position) {
            self.drag.press(point);
            return;
        }
        self.selecting = true;
        self.user_batch(|editor| editor.move_to(position, mods.shift()));
        self.blink.reset();
    }

    /// Pointer motion with the button held. Returns the drag payload when a
    /// drag starts; the host then runs the platform drag.
    pub fn mouse_move(&mut self, point: Point) -> Option<DragData> {
        if self.drag.is_pending() {
            if self.drag.update(point) {
                self.selecting = false;
                return self.editor.start_drag();
            }
            return None;
        }
        if self.selecting {
            if let Some(position) = self.editor.hit_test(point) {
                self.user_batch(|editor| editor.move_to(position, true));
            }
        }
        None
    }

    pub fn mouse_release(&mut self, point: Point) {
        if self.drag.release().is_some() {
            // A click inside the selection that never became a drag
            if let Some(position) = self.editor.hit_test(point) {
                self.user_batch(|editor| editor.move_to(position, false));
            }
        }
        if std::mem::take(&mut self.selecting) {
            self.update_primary_selection();
        }
    }

    /// Select the word under the pointer
    pub fn mouse_double_click(&mut self, point: Point) {
        let Some(position) = self.editor.hit_test(point) else {
            return;
        };
        self.drag.cancel();
        self.selecting = false;
        self.user_batch(|editor| {
            editor.move_to(position, false);
            editor.move_relative(MoveUnit::WordUnderCursor, false, 1);
        });
        self.update_primary_selection();
    }

    /// Middle click: paste the primary selection at the pointer
    pub fn mouse_middle_click(&mut self, point: Point) -> bool {
        if !self.theme.supports_selection_clipboard || self.editor.is_read_only() {
            return false;
        }
        let Some(position) = self.editor.hit_test(point) else {
            return false;
        };
        self.editor.begin_batch(ChangeOrigin::User);
        self.editor.move_to(position, false);
        let pasted = self.paste_from(ClipboardKind::Selection);
        self.editor.end_batch();
        pasted
    }

    // === Drag and drop ===

    /// The drag this editor started has ended
    pub fn finish_drag(
        &mut self,
        data: &DragData,
        action: Option<DropAction>,
        target: Option<EditorId>,
    ) -> bool {
        self.drag.cancel();
        self.user_batch(|editor| editor.finish_drag(data, action, target))
    }

    pub fn drag_move(&mut self, point: Point) -> Option<usize> {
        self.editor.drag_move(point)
    }

    pub fn drag_leave(&mut self) {
        self.editor.drag_leave();
    }

    /// Drop at the pointer
    pub fn drop_at(&mut self, data: &DragData, point: Point, action: DropAction) -> bool {
        let Some(position) = self.editor.hit_test(point) else {
            return false;
        };
        self.suggestion = None;
        self.text_batch(|editor| editor.drop_payload(data, position, action))
    }

    // === Focus and blinking ===

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn focus_in(&mut self) {
        self.focused = true;
        self.refresh_blink();
    }

    /// Losing focus commits any composition and stops blinking
    pub fn focus_out(&mut self) {
        self.focused = false;
        self.selecting = false;
        self.drag.cancel();
        self.user_batch(DocumentEditor::commit_preedit);
        self.refresh_blink();
    }

    fn refresh_blink(&mut self) {
        if self.focused && !self.editor.is_read_only() {
            self.blink.start();
        } else {
            self.blink.stop(false);
        }
    }

    /// Whether the caret should be drawn right now
    pub fn cursor_visible(&self) -> bool {
        self.blink.is_visible()
    }

    pub fn blink_timer(&self) -> &BlinkTimer {
        &self.blink
    }

    /// Timer callback: flip the caret and ask for a redraw of its
    /// rectangle only
    pub fn blink_tick(&mut self) -> Option<EditorEvent> {
        if !self.blink.tick() {
            return None;
        }
        self.editor.cursor_rect().map(EditorEvent::UpdateNeeded)
    }
}

/// The part of `candidate` not yet typed, if `typed` is a case-insensitive
/// prefix of it
fn completion_suffix<'a>(typed: &str, candidate: &'a str) -> Option<&'a str> {
    let typed_len = char_len(typed);
    let split = candidate
        .char_indices()
        .nth(typed_len)
        .map(|(i, _)| i)
        .unwrap_or(candidate.len());
    let (head, tail) = candidate.split_at(split);
    (char_len(head) == typed_len && head.to_lowercase() == typed.to_lowercase()).then_some(tail)
}
