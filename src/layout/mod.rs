//! Layout projector: turns a [`Document`] into measured, positioned lines and
//! maps between document offsets and pixel positions.
//!
//! `SingleLine` lays every paragraph out on one row, left to right, with a
//! separator gap between paragraphs. `MultiLine` stacks one line per
//! paragraph. Lines never wrap.

pub mod line;
pub mod metrics;

pub use line::{FormatRange, LineLayout, PreeditSpan};
pub use metrics::{FontMetrics, FontdueMetrics, MonospaceMetrics};

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::geometry::{Point, Rect};

/// How paragraphs are arranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// All paragraphs on one row, separated by a gap
    #[default]
    SingleLine,
    /// One row per paragraph
    MultiLine,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Inputs that change the layout independently of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub mode: LayoutMode,
    pub direction: LayoutDirection,
    /// Width of the gap between paragraphs in `SingleLine` mode
    pub separator_width: f32,
    /// Available width; only consulted by `MultiLine` (for RTL alignment)
    pub viewport_width: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            mode: LayoutMode::SingleLine,
            direction: LayoutDirection::LeftToRight,
            separator_width: 12.0,
            viewport_width: 0.0,
        }
    }
}

/// Preedit text to show at a global document offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditOverlay {
    pub anchor: usize,
    pub text: String,
    /// Relative to the preedit text
    pub format_ranges: Vec<FormatRange>,
}

/// The measured projection of a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub mode: LayoutMode,
    pub direction: LayoutDirection,
    pub lines: Vec<LineLayout>,
    pub separator_width: f32,
    pub width: f32,
    pub height: f32,
}

impl TextLayout {
    pub fn build(
        document: &Document,
        settings: &LayoutSettings,
        preedit: Option<&PreeditOverlay>,
        metrics: &dyn FontMetrics,
    ) -> Self {
        let preedit_at = preedit.and_then(|p| document.locate(p.anchor).ok());

        let mut lines: Vec<LineLayout> = document
            .paragraphs()
            .iter()
            .enumerate()
            .map(|(idx, paragraph)| {
                let span = match (preedit, preedit_at) {
                    (Some(p), Some((pidx, local))) if pidx == idx => Some(PreeditSpan {
                        start: local,
                        text: p.text.clone(),
                        format_ranges: p.format_ranges.clone(),
                    }),
                    _ => None,
                };
                LineLayout::build(paragraph, span, metrics)
            })
            .collect();

        let separator_width = match settings.mode {
            LayoutMode::SingleLine => settings.separator_width,
            LayoutMode::MultiLine => 0.0,
        };

        let (width, height) = match settings.mode {
            LayoutMode::SingleLine => {
                let mut x = 0.0;
                let mut height: f32 = 0.0;
                for line in &mut lines {
                    line.position = Point::new(x, 0.0);
                    x += line.line_width + separator_width;
                    height = height.max(line.height);
                }
                // The trailing separator is not part of the width
                (x - separator_width, height)
            }
            LayoutMode::MultiLine => {
                let mut y = 0.0;
                let mut width: f32 = 0.0;
                for line in &mut lines {
                    line.position = Point::new(0.0, y);
                    y += line.height;
                    width = width.max(line.line_width);
                }
                (width.max(settings.viewport_width), y)
            }
        };

        tracing::trace!(
            lines = lines.len(),
            width,
            height,
            mode = ?settings.mode,
            "Built text layout"
        );

        Self {
            mode: settings.mode,
            direction: settings.direction,
            lines,
            separator_width,
            width,
            height,
        }
    }

    /// Global offset of the first char of line `index`
    pub fn layout_start(&self, index: usize) -> usize {
        self.lines.iter().take(index).map(|l| l.len() + 1).sum()
    }

    /// Resolve a global offset to `(line, local offset)`.
    ///
    /// Each line consumes its length plus one separator; anything past the
    /// end clamps to the end of the last line.
    pub fn cursor_to_layout(&self, global: usize) -> (usize, usize) {
        let mut remaining = global;
        let last = self.lines.len().saturating_sub(1);
        for (idx, line) in self.lines.iter().enumerate() {
            if remaining <= line.len() {
                return (idx, remaining);
            }
            if idx == last {
                break;
            }
            remaining -= line.len() + 1;
        }
        (last, self.lines.get(last).map(LineLayout::len).unwrap_or(0))
    }

    fn mirror(&self, x: f32) -> f32 {
        match self.direction {
            LayoutDirection::LeftToRight => x,
            LayoutDirection::RightToLeft => self.width - x,
        }
    }

    /// Layout x of a global offset
    pub fn cursor_to_x(&self, global: usize) -> f32 {
        let (idx, local) = self.cursor_to_layout(global);
        match self.lines.get(idx) {
            Some(line) => self.mirror(line.position.x + line.cursor_to_x(local)),
            None => 0.0,
        }
    }

    /// Caret rectangle for a global offset
    pub fn cursor_rect(&self, global: usize, cursor_width: f32) -> Rect {
        let (idx, _) = self.cursor_to_layout(global);
        let Some(line) = self.lines.get(idx) else {
            return Rect::new(0.0, 0.0, cursor_width, 0.0);
        };
        Rect::new(self.cursor_to_x(global), line.position.y, cursor_width, line.height)
    }

    /// Caret rectangle `offset` chars into the preedit, if one is displayed
    pub fn preedit_cursor_rect(&self, offset: usize, cursor_width: f32) -> Option<Rect> {
        let line = self.lines.iter().find(|l| l.preedit.is_some())?;
        let x = line.position.x + line.preedit_cursor_x(offset)?;
        Some(Rect::new(self.mirror(x), line.position.y, cursor_width, line.height))
    }

    /// Global offset nearest to layout x.
    ///
    /// Picks the line whose extent (trailing separator included) contains
    /// `x`, or the last line, and hit-tests within it.
    pub fn x_to_position(&self, x: f32) -> usize {
        let x = self.mirror(x);
        let idx = self
            .lines
            .iter()
            .position(|line| x < line.position.x + line.line_width + self.separator_width)
            .unwrap_or(self.lines.len().saturating_sub(1));
        self.position_in_line(idx, x)
    }

    /// Global offset nearest to a point; `MultiLine` picks the row by `y`.
    pub fn hit_test(&self, point: Point) -> usize {
        match self.mode {
            LayoutMode::SingleLine => self.x_to_position(point.x),
            LayoutMode::MultiLine => {
                let idx = self
                    .lines
                    .iter()
                    .position(|line| point.y < line.position.y + line.height)
                    .unwrap_or(self.lines.len().saturating_sub(1));
                self.position_in_line(idx, self.mirror(point.x))
            }
        }
    }

    fn position_in_line(&self, idx: usize, x: f32) -> usize {
        match self.lines.get(idx) {
            Some(line) => self.layout_start(idx) + line.hit_test(x - line.position.x),
            None => 0,
        }
    }

    /// Rectangle of line `index`
    pub fn line_rect(&self, index: usize) -> Option<Rect> {
        let line = self.lines.get(index)?;
        let rect = line.rect();
        Some(match self.direction {
            LayoutDirection::LeftToRight => rect,
            LayoutDirection::RightToLeft => Rect::new(
                self.width - rect.right(),
                rect.y,
                rect.width,
                rect.height,
            ),
        })
    }

    /// Bounding rectangles of `[start, end)`, one per line it touches
    pub fn selection_rects(&self, start: usize, end: usize) -> Vec<Rect> {
        if start >= end {
            return Vec::new();
        }
        let (first, _) = self.cursor_to_layout(start);
        let (last, _) = self.cursor_to_layout(end);
        (first..=last)
            .filter_map(|idx| {
                let line = self.lines.get(idx)?;
                let line_start = self.layout_start(idx);
                let from = start.max(line_start) - line_start;
                let to = end.min(line_start + line.len()) - line_start;
                let a = self.mirror(line.position.x + line.cursor_to_x(from));
                let b = self.mirror(line.position.x + line.cursor_to_x(to.max(from)));
                Some(Rect::new(a.min(b), line.position.y, (b - a).abs(), line.height))
            })
            .collect()
    }
}
