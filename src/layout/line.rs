//! A single measured line: one paragraph, optionally with the preedit text
//! of an active composition spliced in.

use crate::document::{CharFormat, Paragraph};
use crate::geometry::{Point, Rect};
use crate::util::display_char;

use super::metrics::FontMetrics;

/// A format applied to `[start, end)` of a line's displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRange {
    pub start: usize,
    pub end: usize,
    pub format: CharFormat,
}

impl FormatRange {
    pub fn new(start: usize, end: usize, format: CharFormat) -> Self {
        Self { start, end, format }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx >= self.start && idx < self.end
    }
}

/// Preedit text shown inside a line.
///
/// `start` is the paragraph-local offset where the preedit appears, which is
/// also its index in the displayed text. Format ranges are relative to the
/// preedit text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditSpan {
    pub start: usize,
    pub text: String,
    pub format_ranges: Vec<FormatRange>,
}

impl PreeditSpan {
    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One measured, positioned line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Displayed text: renderable chars only, preedit included
    pub text: String,
    /// Base formats over the displayed text (preedit excluded)
    pub format_ranges: Vec<FormatRange>,
    pub preedit: Option<PreeditSpan>,
    /// Cumulative x of every displayed char boundary (`len + 1` entries)
    pub advances: Vec<f32>,
    pub line_width: f32,
    pub ascent: f32,
    pub height: f32,
    pub position: Point,
    /// Document length of the paragraph behind this line
    doc_len: usize,
}

impl LineLayout {
    /// Measure `paragraph` with `metrics`, splicing in `preedit` if given.
    pub fn build(
        paragraph: &Paragraph,
        preedit: Option<PreeditSpan>,
        metrics: &dyn FontMetrics,
    ) -> Self {
        let doc_len = paragraph.len();
        let preedit = preedit
            .filter(|p| !p.is_empty())
            .map(|mut p| {
                p.start = p.start.min(doc_len);
                p
            });
        let split = preedit.as_ref().map(|p| p.start);
        let shift = preedit.as_ref().map(PreeditSpan::len).unwrap_or(0);

        // Base format ranges in displayed coordinates
        let mut format_ranges = Vec::with_capacity(paragraph.fragments().len() + 1);
        let mut offset = 0;
        for fragment in paragraph.fragments() {
            let start = offset;
            let end = offset + fragment.len();
            offset = end;
            match split {
                Some(at) if start < at && at < end => {
                    format_ranges.push(FormatRange::new(start, at, fragment.format));
                    format_ranges.push(FormatRange::new(at + shift, end + shift, fragment.format));
                }
                Some(at) if start >= at => {
                    format_ranges.push(FormatRange::new(start + shift, end + shift, fragment.format));
                }
                _ => format_ranges.push(FormatRange::new(start, end, fragment.format)),
            }
        }

        let base_text = paragraph.text();
        let mut text = String::with_capacity(base_text.len());
        let mut chars = Vec::with_capacity(doc_len + shift);
        let preedit_base = paragraph.format_before(split.unwrap_or(0));
        for (idx, ch) in base_text.chars().enumerate() {
            if let (Some(at), Some(p)) = (split, preedit.as_ref()) {
                if idx == at {
                    push_preedit(&mut chars, p, preedit_base);
                }
            }
            chars.push((display_char(ch), None));
        }
        if let (Some(at), Some(p)) = (split, preedit.as_ref()) {
            if at == doc_len {
                push_preedit(&mut chars, p, preedit_base);
            }
        }

        let mut advances = Vec::with_capacity(chars.len() + 1);
        let mut x = 0.0;
        advances.push(x);
        for (display_idx, (ch, preedit_format)) in chars.iter().enumerate() {
            text.push(*ch);
            let format = preedit_format.unwrap_or_else(|| {
                format_ranges
                    .iter()
                    .find(|r| r.contains(display_idx))
                    .map(|r| r.format)
                    .unwrap_or_default()
            });
            x += metrics.advance(*ch, &format);
            advances.push(x);
        }

        Self {
            text,
            format_ranges,
            preedit,
            advances,
            line_width: x,
            ascent: metrics.ascent(),
            height: metrics.height(),
            position: Point::default(),
            doc_len,
        }
    }

    /// Document length of the paragraph, preedit not included
    pub fn len(&self) -> usize {
        self.doc_len
    }

    pub fn is_empty(&self) -> bool {
        self.doc_len == 0
    }

    /// Number of displayed chars, preedit included
    pub fn display_len(&self) -> usize {
        self.advances.len() - 1
    }

    /// Line-relative x of displayed boundary `idx` (clamped)
    pub fn display_x(&self, idx: usize) -> f32 {
        self.advances[idx.min(self.display_len())]
    }

    /// Displayed index of a document-local offset: offsets at or after the
    /// preedit anchor are pushed past the preedit.
    pub fn display_index(&self, local: usize) -> usize {
        let local = local.min(self.doc_len);
        match &self.preedit {
            Some(p) if local >= p.start => local + p.len(),
            _ => local,
        }
    }

    /// Line-relative x of document-local offset `local`
    pub fn cursor_to_x(&self, local: usize) -> f32 {
        self.display_x(self.display_index(local))
    }

    /// Line-relative x of a caret `offset` chars into the preedit
    pub fn preedit_cursor_x(&self, offset: usize) -> Option<f32> {
        let p = self.preedit.as_ref()?;
        Some(self.display_x(p.start + offset.min(p.len())))
    }

    /// Nearest document-local offset to line-relative `x`.
    ///
    /// Picks the closest glyph boundary, splitting each glyph at its
    /// midpoint. Hits inside the preedit resolve to its anchor.
    pub fn hit_test(&self, x: f32) -> usize {
        let display = self.nearest_boundary(x);
        match &self.preedit {
            Some(p) if display >= p.start + p.len() => display - p.len(),
            Some(p) if display > p.start => p.start,
            _ => display,
        }
    }

    fn nearest_boundary(&self, x: f32) -> usize {
        if x <= 0.0 {
            return 0;
        }
        for idx in 0..self.display_len() {
            let mid = (self.advances[idx] + self.advances[idx + 1]) / 2.0;
            if x < mid {
                return idx;
            }
        }
        self.display_len()
    }

    /// Effective format of displayed char `idx`, with preedit formats on top
    pub fn format_at(&self, idx: usize) -> CharFormat {
        if let Some(p) = &self.preedit {
            if idx >= p.start && idx < p.start + p.len() {
                let local = idx - p.start;
                return p
                    .format_ranges
                    .iter()
                    .filter(|r| r.contains(local))
                    .fold(CharFormat::default(), |acc, r| acc.merged(&r.format));
            }
        }
        self.format_ranges
            .iter()
            .find(|r| r.contains(idx))
            .map(|r| r.format)
            .unwrap_or_default()
    }

    /// Bounding rectangle in layout coordinates
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.line_width, self.height)
    }
}

fn push_preedit(chars: &mut Vec<(char, Option<CharFormat>)>, preedit: &PreeditSpan, base: CharFormat) {
    for (idx, ch) in preedit.text.chars().enumerate() {
        let format = preedit
            .format_ranges
            .iter()
            .filter(|r| r.contains(idx))
            .fold(base, |acc, r| acc.merged(&r.format));
        chars.push((display_char(ch), Some(format)));
    }
}
