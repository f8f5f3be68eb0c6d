//! Engine configuration
//!
//! Stored in `~/.config/richline/config.yaml`. Every field is optional in the
//! file; missing fields take their defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::editable::{DocumentEditor, EditConstraints};
use crate::interaction::{CompletionMode, LineEditor};
use crate::layout::{FontMetrics, FontdueMetrics, LayoutDirection, LayoutMode, MonospaceMetrics};
use crate::theme::PlatformTheme;

/// Settings applied to every editor the host creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout_mode: LayoutMode,
    pub direction: LayoutDirection,
    /// Gap drawn between paragraphs shown on one row
    pub separator_width: f32,
    pub cursor_width: f32,
    /// Font size in pixels
    pub font_size: f32,
    /// TTF/OTF file for glyph metrics; monospace cells are assumed without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    pub completion_mode: CompletionMode,
    /// Undo steps kept per editor
    pub history_size: usize,
    pub read_only: bool,
    /// Maximum document length (None = unlimited)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub theme: PlatformTheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::default(),
            direction: LayoutDirection::default(),
            separator_width: 12.0,
            cursor_width: 1.0,
            font_size: 16.0,
            font_path: None,
            completion_mode: CompletionMode::default(),
            history_size: 1000,
            read_only: false,
            max_length: None,
            theme: PlatformTheme::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Write the config, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn constraints(&self) -> EditConstraints {
        let base = if self.read_only {
            EditConstraints::read_only()
        } else {
            EditConstraints::editor()
        };
        EditConstraints {
            max_length: self.max_length,
            ..base
        }
    }

    /// Glyph metrics for the configured font, falling back to monospace
    /// cells when the font cannot be loaded
    pub fn metrics(&self) -> Box<dyn FontMetrics> {
        let monospace = || -> Box<dyn FontMetrics> {
            Box::new(MonospaceMetrics::new(
                (self.font_size * 0.6).round(),
                (self.font_size * 1.25).round(),
            ))
        };
        let Some(path) = &self.font_path else {
            return monospace();
        };
        let loaded = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))
            .and_then(|bytes| FontdueMetrics::from_bytes(&bytes, self.font_size));
        match loaded {
            Ok(metrics) => Box::new(metrics),
            Err(e) => {
                tracing::warn!("{:#}, using monospace metrics", e);
                monospace()
            }
        }
    }

    /// A document editor configured from these settings
    pub fn build_editor(&self, document: Option<Document>) -> DocumentEditor {
        let mut editor = DocumentEditor::new(self.constraints());
        editor.set_history_limit(self.history_size);
        editor.set_metrics(self.metrics());
        editor.set_layout_mode(self.layout_mode);
        editor.set_direction(self.direction);
        editor.set_separator_width(self.separator_width);
        editor.set_cursor_width(self.cursor_width);
        if document.is_some() {
            editor.bind_document(document);
        }
        editor.take_events();
        editor
    }

    /// A line editor with this config's editor and theme
    pub fn build_line_editor(&self, document: Option<Document>) -> LineEditor {
        let mut line = LineEditor::new(self.build_editor(document), self.theme);
        line.set_completer(None, self.completion_mode);
        line
    }
}
