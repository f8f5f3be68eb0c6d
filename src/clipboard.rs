//! Clipboard exchange: copy, cut and paste of rich and plain payloads
//!
//! The editor never talks to the OS directly. It goes through a
//! [`ClipboardService`]; [`MemoryClipboard`] backs tests and headless use,
//! [`SystemClipboard`] wraps `arboard` when the `system-clipboard` feature is
//! enabled.

use std::collections::HashMap;

use crate::document::{CharFormat, DocumentFragment, TextFormat};
use crate::editable::{DocumentEditor, Insertion};
use crate::error::{EditError, EditResult};

/// Which clipboard to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipboardKind {
    /// The regular copy/paste clipboard
    Clipboard,
    /// The X11-style primary selection (select to copy, middle-click paste)
    Selection,
}

/// Clipboard content: a plain-text fallback and optional rich markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub plain: Option<String>,
    /// Rich-text markup, as produced by [`DocumentFragment::to_markup`]
    pub rich: Option<String>,
}

impl ClipboardPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain: Some(text.into()),
            rich: None,
        }
    }

    /// Both representations of `fragment`
    pub fn from_fragment(fragment: &DocumentFragment) -> Self {
        Self {
            plain: Some(fragment.text()),
            rich: Some(fragment.to_markup()),
        }
    }

    /// True when neither representation is present
    pub fn is_empty(&self) -> bool {
        self.plain.is_none() && self.rich.is_none()
    }

    /// The content to insert, preferring the rich representation
    pub fn to_fragment(&self, plain_format: CharFormat) -> Option<DocumentFragment> {
        if let Some(rich) = &self.rich {
            return Some(DocumentFragment::from_markup(rich, CharFormat::new()));
        }
        self.plain
            .as_deref()
            .map(|plain| DocumentFragment::from_plain_text(plain, plain_format))
    }
}

/// Source and sink for clipboard payloads
pub trait ClipboardService: std::fmt::Debug {
    fn payload(&self, kind: ClipboardKind) -> Option<ClipboardPayload>;
    fn set_payload(&mut self, kind: ClipboardKind, payload: ClipboardPayload);
}

/// In-process clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: HashMap<ClipboardKind, ClipboardPayload>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardService for MemoryClipboard {
    fn payload(&self, kind: ClipboardKind) -> Option<ClipboardPayload> {
        self.contents.get(&kind).cloned()
    }

    fn set_payload(&mut self, kind: ClipboardKind, payload: ClipboardPayload) {
        self.contents.insert(kind, payload);
    }
}

/// The operating system clipboard.
///
/// Rich payloads are published as HTML with the plain text as fallback.
/// Reading only returns plain text, which is pasted as such.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Option<arboard::Clipboard> {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!(%err, "System clipboard unavailable");
                None
            }
        }
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardService for SystemClipboard {
    fn payload(&self, kind: ClipboardKind) -> Option<ClipboardPayload> {
        let mut clipboard = Self::open()?;
        let text = match kind {
            ClipboardKind::Clipboard => clipboard.get_text(),
            #[cfg(target_os = "linux")]
            ClipboardKind::Selection => {
                use arboard::{GetExtLinux, LinuxClipboardKind};
                clipboard
                    .get()
                    .clipboard(LinuxClipboardKind::Primary)
                    .text()
            }
            #[cfg(not(target_os = "linux"))]
            ClipboardKind::Selection => return None,
        };
        match text {
            Ok(text) => Some(ClipboardPayload::plain(text)),
            Err(err) => {
                tracing::debug!(%err, ?kind, "No text on system clipboard");
                None
            }
        }
    }

    fn set_payload(&mut self, kind: ClipboardKind, payload: ClipboardPayload) {
        let Some(mut clipboard) = Self::open() else {
            return;
        };
        let plain = payload.plain.clone().unwrap_or_default();
        let result = match (kind, payload.rich) {
            (ClipboardKind::Clipboard, Some(rich)) => clipboard.set_html(rich, Some(plain)),
            (ClipboardKind::Clipboard, None) => clipboard.set_text(plain),
            #[cfg(target_os = "linux")]
            (ClipboardKind::Selection, _) => {
                use arboard::{LinuxClipboardKind, SetExtLinux};
                clipboard
                    .set()
                    .clipboard(LinuxClipboardKind::Primary)
                    .text(plain)
            }
            #[cfg(not(target_os = "linux"))]
            (ClipboardKind::Selection, _) => Ok(()),
        };
        if let Err(err) = result {
            tracing::warn!(%err, ?kind, "Failed to write system clipboard");
        }
    }
}

impl DocumentEditor {
    /// Put the selection on `kind` as rich and plain text. No-op without a
    /// selection.
    pub fn copy_to(&self, clipboard: &mut dyn ClipboardService, kind: ClipboardKind) -> bool {
        let Some(fragment) = self.selected_fragment() else {
            return false;
        };
        tracing::debug!(?kind, len = fragment.len(), "Copy selection");
        clipboard.set_payload(kind, ClipboardPayload::from_fragment(&fragment));
        true
    }

    /// Copy the selection to the regular clipboard
    pub fn copy(&self, clipboard: &mut dyn ClipboardService) -> bool {
        self.copy_to(clipboard, ClipboardKind::Clipboard)
    }

    /// Copy, then delete the selection
    pub fn cut(&mut self, clipboard: &mut dyn ClipboardService) -> bool {
        if !self.can_edit() || !self.has_selection() {
            return false;
        }
        self.batch(|editor| editor.copy(clipboard) && editor.delete_selection())
    }

    /// Insert `payload` at the cursor, replacing the selection. Rich markup
    /// is inserted with its own formats, plain text takes the format at the
    /// insertion point. Returns the inserted length.
    pub fn paste(&mut self, payload: &ClipboardPayload) -> EditResult<usize> {
        if !self.is_bound() {
            return Err(EditError::NoDocumentBound);
        }
        if payload.is_empty() {
            tracing::debug!("Paste ignored: payload has no usable representation");
            return Err(EditError::UnsupportedPayload);
        }
        if !self.can_edit() {
            return Ok(0);
        }
        Ok(self.batch(|editor| {
            editor.commit_preedit();
            let (start, end) = editor.cursor().range();
            let inserted = match (&payload.rich, &payload.plain) {
                (None, Some(plain)) => {
                    editor.replace_range(start, end, Insertion::Text(plain, TextFormat::PlainText))
                }
                _ => payload.to_fragment(CharFormat::new()).and_then(|fragment| {
                    editor.replace_range(start, end, Insertion::Fragment(&fragment))
                }),
            };
            inserted.unwrap_or(0)
        }))
    }

    /// Paste whatever `kind` currently holds
    pub fn paste_from(
        &mut self,
        clipboard: &dyn ClipboardService,
        kind: ClipboardKind,
    ) -> EditResult<usize> {
        let payload = clipboard.payload(kind).unwrap_or_default();
        self.paste(&payload)
    }
}
