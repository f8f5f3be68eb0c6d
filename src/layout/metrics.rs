//! Font metrics used to measure layouts.

use fontdue::{Font, FontSettings};
use unicode_width::UnicodeWidthChar;

use crate::document::CharFormat;

/// Glyph measurements the layout projector needs.
pub trait FontMetrics: std::fmt::Debug {
    /// Horizontal advance of `ch` rendered with `format`
    fn advance(&self, ch: char, format: &CharFormat) -> f32;

    /// Distance from the top of a line to its baseline
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of a line
    fn descent(&self) -> f32;

    /// Full line height
    fn height(&self) -> f32 {
        self.ascent() + self.descent()
    }
}

/// Fixed-cell metrics: every column of a char (per Unicode East Asian width)
/// is one cell. Tab advances a configurable number of cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub cell_width: f32,
    pub ascent: f32,
    pub descent: f32,
    pub tab_cells: usize,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(10.0, 20.0)
    }
}

impl MonospaceMetrics {
    /// Metrics with the baseline at 80% of the line height
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        let ascent = (line_height * 0.8).round();
        Self {
            cell_width,
            ascent,
            descent: line_height - ascent,
            tab_cells: 4,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn advance(&self, ch: char, _format: &CharFormat) -> f32 {
        let cells = if ch == '\t' {
            self.tab_cells
        } else {
            // Combining marks take no cell
            ch.width().unwrap_or(0)
        };
        cells as f32 * self.cell_width
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }
}

/// Metrics read from a real font through fontdue.
pub struct FontdueMetrics {
    font: Font,
    size: f32,
    ascent: f32,
    descent: f32,
    line_gap: f32,
}

impl std::fmt::Debug for FontdueMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueMetrics")
            .field("size", &self.size)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .finish()
    }
}

impl FontdueMetrics {
    /// Load a font from TTF/OTF bytes at `size` pixels
    pub fn from_bytes(bytes: &[u8], size: f32) -> anyhow::Result<Self> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to load font: {}", e))?;
        Ok(Self::new(font, size))
    }

    pub fn new(font: Font, size: f32) -> Self {
        let (ascent, descent, line_gap) = match font.horizontal_line_metrics(size) {
            Some(line) => (line.ascent, -line.descent, line.line_gap),
            None => {
                tracing::warn!("Font has no horizontal line metrics, estimating from size");
                (size * 0.8, size * 0.2, 0.0)
            }
        };
        Self {
            font,
            size,
            ascent,
            descent,
            line_gap,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

impl FontMetrics for FontdueMetrics {
    fn advance(&self, ch: char, format: &CharFormat) -> f32 {
        let advance = self.font.metrics(ch, self.size).advance_width;
        // No separate bold face: synthetic emboldening widens each glyph a bit
        if format.is_bold() {
            advance + (self.size / 24.0).max(1.0)
        } else {
            advance
        }
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}
