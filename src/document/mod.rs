//! The rich document model: paragraphs of formatted fragments.
//!
//! Positions are char offsets into the *flattened* document, where each
//! paragraph separator counts as one unit. A document always has at least one
//! paragraph, so the empty document is a single empty paragraph.
//!
//! Layout and cursor code only ever hold offsets into this structure, never
//! references, so a document can be rebuilt or swapped freely.

pub mod format;
pub mod markup;
pub mod paragraph;

pub use format::{CharFormat, Color, FormatAttribute};
pub use paragraph::{Fragment, Paragraph};

use crate::error::{EditError, EditResult};

/// How inserted text should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// Sniff: markup if it contains recognizable tags, plain otherwise
    #[default]
    Auto,
    PlainText,
    RichText,
}

impl TextFormat {
    /// Whether `text` should be parsed as markup under this hint
    pub fn is_rich(self, text: &str) -> bool {
        match self {
            TextFormat::Auto => markup::looks_like_markup(text),
            TextFormat::PlainText => false,
            TextFormat::RichText => true,
        }
    }
}

/// A detached piece of a document (one or more paragraph pieces), as
/// produced by slicing/removal and consumed by insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFragment {
    paragraphs: Vec<Paragraph>,
}

impl Default for DocumentFragment {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
        }
    }
}

impl DocumentFragment {
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        if paragraphs.is_empty() {
            return Self::default();
        }
        Self { paragraphs }
    }

    /// Plain text in one format; newlines and U+2029 start new paragraphs
    pub fn from_plain_text(text: &str, format: CharFormat) -> Self {
        let paragraphs = text
            .split(['\n', '\u{2029}'])
            .map(|line| Paragraph::from_text(line.strip_suffix('\r').unwrap_or(line), format))
            .collect();
        Self::from_paragraphs(paragraphs)
    }

    pub fn from_markup(markup: &str, base: CharFormat) -> Self {
        markup::parse_markup(markup, base)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Length in document units (separators included)
    pub fn len(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::len).sum::<usize>() + self.paragraphs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain text with `'\n'` between paragraphs
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_markup(&self) -> String {
        markup::to_markup(self)
    }
}

/// The document being edited.
#[derive(Debug, Clone)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
    revision: u64,
    dirty: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    /// Content equality; revision and dirty state are bookkeeping
    fn eq(&self, other: &Self) -> bool {
        self.paragraphs == other.paragraphs
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            paragraphs: vec![Paragraph::new()],
            revision: 0,
            dirty: false,
        }
    }

    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let mut document = Self::new();
        if !paragraphs.is_empty() {
            document.paragraphs = paragraphs;
        }
        document
    }

    pub fn from_plain_text(text: &str) -> Self {
        Self::from_fragment(DocumentFragment::from_plain_text(text, CharFormat::new()))
    }

    pub fn from_markup(markup: &str) -> Self {
        Self::from_fragment(DocumentFragment::from_markup(markup, CharFormat::new()))
    }

    pub fn from_fragment(fragment: DocumentFragment) -> Self {
        Self::from_paragraphs(fragment.paragraphs)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Flattened length: paragraph lengths plus one per separator
    pub fn len(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::len).sum::<usize>() + self.paragraphs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain text with `'\n'` between paragraphs
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_markup(&self) -> String {
        markup::to_markup(&DocumentFragment::from_paragraphs(self.paragraphs.clone()))
    }

    /// Incremented by every mutation; layouts are cached against it
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    fn check(&self, offset: usize) -> EditResult<()> {
        let len = self.len();
        if offset > len {
            return Err(EditError::OutOfRange { offset, len });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> EditResult<()> {
        if start > end {
            return Err(EditError::InvalidRange { start, end });
        }
        self.check(end)
    }

    /// Offset of the first char of paragraph `index`
    pub fn paragraph_start(&self, index: usize) -> usize {
        self.paragraphs
            .iter()
            .take(index)
            .map(|p| p.len() + 1)
            .sum()
    }

    /// Resolve a flattened offset to `(paragraph, local offset)`.
    ///
    /// An offset on a separator resolves to the end of the paragraph before it.
    pub fn locate(&self, offset: usize) -> EditResult<(usize, usize)> {
        self.check(offset)?;
        let mut remaining = offset;
        let last = self.paragraphs.len() - 1;
        for (idx, paragraph) in self.paragraphs.iter().enumerate() {
            let len = paragraph.len();
            if remaining <= len || idx == last {
                return Ok((idx, remaining.min(len)));
            }
            remaining -= len + 1;
        }
        Ok((last, self.paragraphs[last].len()))
    }

    fn locate_clamped(&self, offset: usize) -> (usize, usize) {
        self.locate(offset.min(self.len())).unwrap_or((0, 0))
    }

    /// Char at `offset`; separators read as U+2029
    pub fn char_at(&self, offset: usize) -> Option<char> {
        let (idx, local) = self.locate(offset).ok()?;
        let paragraph = &self.paragraphs[idx];
        if local < paragraph.len() {
            paragraph.char_at(local)
        } else if idx + 1 < self.paragraphs.len() {
            Some('\u{2029}')
        } else {
            None
        }
    }

    /// Format typing at `offset` would use (offsets are clamped)
    pub fn query_format(&self, offset: usize) -> CharFormat {
        let (idx, local) = self.locate_clamped(offset);
        self.paragraphs[idx].format_before(local)
    }

    /// Format of the char starting at `offset`, falling back to
    /// [`query_format`](Self::query_format) on separators and the end.
    pub fn format_of_char(&self, offset: usize) -> CharFormat {
        let (idx, local) = self.locate_clamped(offset);
        let paragraph = &self.paragraphs[idx];
        paragraph
            .format_of_char(local)
            .unwrap_or_else(|| paragraph.format_before(local))
    }

    /// Copy of `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> EditResult<DocumentFragment> {
        self.check_range(start, end)?;
        let (sp, sl) = self.locate(start)?;
        let (ep, el) = self.locate(end)?;
        let pieces = (sp..=ep)
            .map(|idx| {
                let paragraph = &self.paragraphs[idx];
                let from = if idx == sp { sl } else { 0 };
                let to = if idx == ep { el } else { paragraph.len() };
                paragraph.slice(from, to)
            })
            .collect();
        Ok(DocumentFragment::from_paragraphs(pieces))
    }

    /// Insert text, interpreting it according to `hint`. Returns the
    /// inserted length in document units.
    pub fn insert_text(&mut self, offset: usize, text: &str, hint: TextFormat) -> EditResult<usize> {
        self.check(offset)?;
        let format = self.query_format(offset);
        let fragment = if hint.is_rich(text) {
            DocumentFragment::from_markup(text, format)
        } else {
            DocumentFragment::from_plain_text(text, format)
        };
        self.insert_fragment(offset, &fragment)
    }

    /// Insert a structured fragment. Returns the inserted length.
    pub fn insert_fragment(&mut self, offset: usize, fragment: &DocumentFragment) -> EditResult<usize> {
        let (idx, local) = self.locate(offset)?;
        if fragment.is_empty() {
            return Ok(0);
        }

        let mut pieces = fragment.paragraphs.iter().cloned();
        let first = pieces.next().unwrap_or_default();
        let rest: Vec<Paragraph> = pieces.collect();

        if rest.is_empty() {
            self.paragraphs[idx].insert_fragments(local, first.fragments().to_vec());
        } else {
            let tail = self.paragraphs[idx].split_off(local);
            self.paragraphs[idx].insert_fragments(local, first.fragments().to_vec());
            let mut new_paragraphs = rest;
            if let Some(last) = new_paragraphs.last_mut() {
                last.append(tail);
            }
            self.paragraphs
                .splice(idx + 1..idx + 1, new_paragraphs);
        }

        self.touch();
        Ok(fragment.len())
    }

    /// Remove `[start, end)`, returning what was removed.
    pub fn remove_range(&mut self, start: usize, end: usize) -> EditResult<DocumentFragment> {
        let removed = self.slice(start, end)?;
        if start == end {
            return Ok(removed);
        }
        let (sp, sl) = self.locate(start)?;
        let (ep, el) = self.locate(end)?;
        if sp == ep {
            self.paragraphs[sp].remove(sl, el);
        } else {
            let first_len = self.paragraphs[sp].len();
            self.paragraphs[sp].remove(sl, first_len);
            let tail = self.paragraphs[ep].split_off(el);
            self.paragraphs.drain(sp + 1..=ep);
            self.paragraphs[sp].append(tail);
        }
        self.touch();
        Ok(removed)
    }

    /// Join paragraph `at` with the one after it
    pub fn merge_paragraphs(&mut self, at: usize) -> EditResult<()> {
        if at + 1 >= self.paragraphs.len() {
            return Err(EditError::OutOfRange {
                offset: at,
                len: self.paragraphs.len(),
            });
        }
        let next = self.paragraphs.remove(at + 1);
        self.paragraphs[at].append(next);
        self.touch();
        Ok(())
    }

    /// Split paragraph `at` at local offset `offset`
    pub fn split_paragraph(&mut self, at: usize, offset: usize) -> EditResult<()> {
        let Some(paragraph) = self.paragraphs.get_mut(at) else {
            return Err(EditError::OutOfRange {
                offset: at,
                len: self.paragraphs.len(),
            });
        };
        let len = paragraph.len();
        if offset > len {
            return Err(EditError::OutOfRange { offset, len });
        }
        let tail = paragraph.split_off(offset);
        self.paragraphs.insert(at + 1, tail);
        self.touch();
        Ok(())
    }

    /// Set (or merge, when `merge` is true) `format` over `[start, end)`.
    pub fn set_format(
        &mut self,
        start: usize,
        end: usize,
        format: &CharFormat,
        merge: bool,
    ) -> EditResult<()> {
        self.update_format(start, end, |current| {
            if merge {
                current.merge(format);
            } else {
                *current = *format;
            }
        })
    }

    /// Rewrite every format in `[start, end)` with `f`.
    pub fn update_format(
        &mut self,
        start: usize,
        end: usize,
        mut f: impl FnMut(&mut CharFormat),
    ) -> EditResult<()> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        let (sp, sl) = self.locate(start)?;
        let (ep, el) = self.locate(end)?;
        for idx in sp..=ep {
            let paragraph = &mut self.paragraphs[idx];
            let from = if idx == sp { sl } else { 0 };
            let to = if idx == ep { el } else { paragraph.len() };
            // An empty paragraph is only covered when its separator is
            if from < to || (paragraph.is_empty() && idx != ep) {
                paragraph.map_format(from, to, &mut f);
            }
        }
        self.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> CharFormat {
        CharFormat::new().with(FormatAttribute::Bold, true)
    }

    fn lengths_consistent(doc: &Document) -> bool {
        let sum: usize = doc.paragraphs().iter().map(Paragraph::len).sum();
        sum + doc.paragraph_count() - 1 == doc.len()
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert_eq!(doc.paragraph_count(), 1);
        assert_eq!(doc.len(), 0);
        assert_eq!(doc.text(), "");
        assert_eq!(doc.locate(0), Ok((0, 0)));
    }

    #[test]
    fn test_flattened_length_counts_separators() {
        let doc = Document::from_plain_text("Line one\nLine two\n");
        assert_eq!(doc.paragraph_count(), 3);
        assert_eq!(doc.len(), 18);
        assert!(lengths_consistent(&doc));
    }

    #[test]
    fn test_locate() {
        let doc = Document::from_plain_text("Line one\nLine two");
        assert_eq!(doc.locate(8), Ok((0, 8)));
        assert_eq!(doc.locate(9), Ok((1, 0)));
        assert_eq!(doc.locate(17), Ok((1, 8)));
        assert_eq!(
            doc.locate(18),
            Err(EditError::OutOfRange { offset: 18, len: 17 })
        );
        assert_eq!(doc.paragraph_start(1), 9);
        assert_eq!(doc.char_at(8), Some('\u{2029}'));
        assert_eq!(doc.char_at(17), None);
    }

    #[test]
    fn test_insert_plain_text_uses_format_at_point() {
        let mut doc = Document::new();
        doc.insert_fragment(0, &DocumentFragment::from_plain_text("bold", bold()))
            .unwrap();
        let inserted = doc.insert_text(4, "er", TextFormat::Auto).unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(doc.text(), "bolder");
        assert_eq!(doc.paragraphs()[0].fragments().len(), 1);
        assert!(doc.query_format(6).is_bold());
    }

    #[test]
    fn test_insert_multi_paragraph_text() {
        let mut doc = Document::from_plain_text("Hello world");
        let inserted = doc.insert_text(5, "\nnew\n", TextFormat::PlainText).unwrap();
        assert_eq!(inserted, 5);
        assert_eq!(doc.text(), "Hello\nnew\n world");
        assert_eq!(doc.paragraph_count(), 3);
        assert!(lengths_consistent(&doc));
    }

    #[test]
    fn test_insert_auto_detects_markup() {
        let mut doc = Document::from_plain_text("ab");
        let inserted = doc.insert_text(1, "<b>X</b>", TextFormat::Auto).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(doc.text(), "aXb");
        assert!(doc.format_of_char(1).is_bold());
        assert!(!doc.format_of_char(2).is_bold());

        let inserted = doc.insert_text(0, "<b>", TextFormat::PlainText).unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(doc.text(), "<b>aXb");
    }

    #[test]
    fn test_out_of_range_does_not_mutate() {
        let mut doc = Document::from_plain_text("abc");
        let revision = doc.revision();
        assert!(matches!(
            doc.insert_text(4, "x", TextFormat::PlainText),
            Err(EditError::OutOfRange { .. })
        ));
        assert_eq!(
            doc.remove_range(2, 1),
            Err(EditError::InvalidRange { start: 2, end: 1 })
        );
        assert!(doc.remove_range(1, 9).is_err());
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.revision(), revision);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_remove_range_across_paragraphs() {
        let mut doc = Document::from_plain_text("Line one\nLine two");
        let removed = doc.remove_range(5, 14).unwrap();
        assert_eq!(removed.text(), "one\nLine");
        assert_eq!(doc.text(), "Line  two");
        assert_eq!(doc.paragraph_count(), 1);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_merge_and_split_paragraphs() {
        let mut doc = Document::from_plain_text("ab\ncd");
        doc.merge_paragraphs(0).unwrap();
        assert_eq!(doc.text(), "abcd");
        assert!(doc.merge_paragraphs(0).is_err());

        doc.split_paragraph(0, 1).unwrap();
        assert_eq!(doc.text(), "a\nbcd");
        assert!(doc.split_paragraph(1, 4).is_err());
        assert!(doc.split_paragraph(5, 0).is_err());
    }

    #[test]
    fn test_set_format_merge_and_replace() {
        let mut doc = Document::from_plain_text("hello world");
        doc.set_format(0, 5, &bold(), true).unwrap();
        let italic = CharFormat::new().with(FormatAttribute::Italic, true);
        doc.set_format(3, 8, &italic, true).unwrap();

        assert!(doc.format_of_char(0).is_bold());
        assert!(!doc.format_of_char(0).is_italic());
        assert!(doc.format_of_char(4).is_bold() && doc.format_of_char(4).is_italic());
        assert!(!doc.format_of_char(6).is_bold() && doc.format_of_char(6).is_italic());

        doc.set_format(0, 11, &CharFormat::new(), false).unwrap();
        assert_eq!(doc.paragraphs()[0].fragments().len(), 1);
    }

    #[test]
    fn test_update_format_covers_empty_paragraph_between() {
        let mut doc = Document::from_plain_text("a\n\nb");
        doc.update_format(0, 4, |f| f.set(FormatAttribute::Bold, true))
            .unwrap();
        assert!(doc.paragraphs()[1].format().is_bold());
        assert!(doc.query_format(2).is_bold());
    }

    #[test]
    fn test_slice_and_insert_fragment_round_trip() {
        let mut doc = Document::from_markup("<b>Hello</b> world<br><i>again</i>");
        let slice = doc.slice(3, 14).unwrap();
        assert_eq!(slice.text(), "lo world\nag");
        let original = doc.clone();
        doc.remove_range(3, 14).unwrap();
        doc.insert_fragment(3, &slice).unwrap();
        assert_eq!(doc, original);
    }
}
