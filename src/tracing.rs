//! Tracing setup and debug snapshots
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=richline::editable=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/richline/logs/richline.log` with daily
//! rotation. File logging uses debug level by default.

use serde::Serialize;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

use crate::editable::DocumentEditor;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`. Fails if a
/// global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
}

/// Lightweight snapshot of cursor/selection state for diffing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorSnapshot {
    pub bound: bool,
    pub len: usize,
    pub position: usize,
    pub anchor: usize,
    pub selection: (usize, usize),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preedit: Option<String>,
}

impl CursorSnapshot {
    pub fn from_editor(editor: &DocumentEditor) -> Self {
        let cursor = editor.cursor();
        Self {
            bound: editor.is_bound(),
            len: editor.len(),
            position: cursor.position,
            anchor: cursor.anchor,
            selection: cursor.range(),
            preedit: editor.composition().map(|c| c.preedit_text.clone()),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &CursorSnapshot) -> Option<String> {
        if self.bound != other.bound {
            return Some(format!("bound: {} → {}", self.bound, other.bound));
        }

        let mut changes = Vec::new();
        if self.len != other.len {
            changes.push(format!("len {} → {}", self.len, other.len));
        }
        if self.position != other.position {
            changes.push(format!("position {} → {}", self.position, other.position));
        }
        if self.selection != other.selection {
            let (start, end) = other.selection;
            if start == end {
                changes.push("selection cleared".to_string());
            } else {
                changes.push(format!("selection [{}, {})", start, end));
            }
        }
        if self.preedit != other.preedit {
            match &other.preedit {
                Some(text) => changes.push(format!("preedit {:?}", text)),
                None => changes.push("preedit ended".to_string()),
            }
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

/// Full editor state for bug reports
#[derive(Debug, Clone, Serialize)]
pub struct EditorDump {
    pub text: String,
    pub markup: Option<String>,
    pub revision: Option<u64>,
    pub undo_steps: usize,
    pub redo_steps: usize,
    pub cursor: CursorSnapshot,
}

impl EditorDump {
    pub fn from_editor(editor: &DocumentEditor) -> Self {
        Self {
            text: editor.text(),
            markup: editor.document().map(|doc| doc.to_markup()),
            revision: editor.document().map(|doc| doc.revision()),
            undo_steps: editor.history_depth().0,
            redo_steps: editor.history_depth().1,
            cursor: CursorSnapshot::from_editor(editor),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, TextFormat};
    use crate::editable::EditConstraints;

    #[test]
    fn test_snapshot_diff() {
        let mut editor = DocumentEditor::with_document(
            Document::from_plain_text("hello"),
            EditConstraints::editor(),
        );
        let before = CursorSnapshot::from_editor(&editor);
        assert_eq!(before.diff(&before), None);

        editor.set_selection(1, 3);
        let after = CursorSnapshot::from_editor(&editor);
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("position 0 → 3; selection [1, 3)")
        );
    }

    #[test]
    fn test_dump_is_json() {
        let mut editor = DocumentEditor::with_document(
            Document::from_markup("<b>hi</b>"),
            EditConstraints::editor(),
        );
        editor.insert("x", TextFormat::PlainText);
        editor.insert("y", TextFormat::PlainText);
        editor.undo();
        let json: serde_json::Value =
            serde_json::from_str(&EditorDump::from_editor(&editor).to_json()).unwrap();
        assert_eq!(json["text"], "xhi");
        assert_eq!(json["cursor"]["position"], 1);
        assert_eq!(json["undo_steps"], 1);
        assert_eq!(json["redo_steps"], 1);
        assert!(json["markup"].as_str().unwrap().contains("<b>"));
    }
}
