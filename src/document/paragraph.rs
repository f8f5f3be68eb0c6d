//! Paragraphs and the formatted fragments they are built from.

use super::format::CharFormat;
use crate::util::{char_len, char_to_byte_idx};

/// A run of text sharing one [`CharFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub format: CharFormat,
}

impl Fragment {
    pub fn new(text: impl Into<String>, format: CharFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One logical line of the document.
///
/// Fragments are non-empty and adjacent fragments never share a format.
/// `format` is what typing into an empty paragraph uses; once the paragraph
/// has text it tracks the first fragment's format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    fragments: Vec<Fragment>,
    format: CharFormat,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty_with_format(format: CharFormat) -> Self {
        Self {
            fragments: Vec::new(),
            format: format.normalized(),
        }
    }

    pub fn from_text(text: &str, format: CharFormat) -> Self {
        let mut paragraph = Self::empty_with_format(format);
        paragraph.push_str(text, format);
        paragraph
    }

    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let format = fragments.first().map(|f| f.format).unwrap_or_default();
        let mut paragraph = Self {
            fragments,
            format,
        };
        paragraph.normalize();
        paragraph
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn format(&self) -> CharFormat {
        self.format
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.fragments.iter().map(Fragment::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Append text with a format, extending the last fragment when it matches
    pub fn push_str(&mut self, text: &str, format: CharFormat) {
        if text.is_empty() {
            return;
        }
        let format = format.normalized();
        if self.fragments.is_empty() {
            self.format = format;
        }
        match self.fragments.last_mut() {
            Some(last) if last.format == format => last.text.push_str(text),
            _ => self.fragments.push(Fragment::new(text, format)),
        }
    }

    /// Format typing at `local` would pick up: the char before it, or the
    /// first char at the paragraph start.
    pub fn format_before(&self, local: usize) -> CharFormat {
        if local == 0 {
            return self
                .fragments
                .first()
                .map(|f| f.format)
                .unwrap_or(self.format);
        }
        self.format_of_char(local - 1)
            .or_else(|| self.fragments.last().map(|f| f.format))
            .unwrap_or(self.format)
    }

    /// Format of the char starting at `local`, if there is one
    pub fn format_of_char(&self, local: usize) -> Option<CharFormat> {
        let mut offset = 0;
        for fragment in &self.fragments {
            let len = fragment.len();
            if local < offset + len {
                return Some(fragment.format);
            }
            offset += len;
        }
        None
    }

    pub fn char_at(&self, local: usize) -> Option<char> {
        let mut offset = 0;
        for fragment in &self.fragments {
            let len = fragment.len();
            if local < offset + len {
                return fragment.text.chars().nth(local - offset);
            }
            offset += len;
        }
        None
    }

    /// Make sure a fragment boundary falls at `local`; returns the index of
    /// the fragment starting there (or `fragments.len()` at the end).
    fn split_fragment_at(&mut self, local: usize) -> usize {
        let mut offset = 0;
        for idx in 0..self.fragments.len() {
            if local == offset {
                return idx;
            }
            let len = self.fragments[idx].len();
            if local < offset + len {
                let byte_idx = char_to_byte_idx(&self.fragments[idx].text, local - offset);
                let tail = self.fragments[idx].text.split_off(byte_idx);
                let format = self.fragments[idx].format;
                self.fragments.insert(idx + 1, Fragment::new(tail, format));
                return idx + 1;
            }
            offset += len;
        }
        self.fragments.len()
    }

    /// Cut the paragraph at `local`, returning everything after it
    pub(crate) fn split_off(&mut self, local: usize) -> Paragraph {
        let typing = self.format_before(local);
        let idx = self.split_fragment_at(local);
        let tail = self.fragments.split_off(idx);
        if self.fragments.is_empty() {
            self.format = typing;
        }
        let mut rest = Paragraph {
            fragments: tail,
            format: typing,
        };
        rest.normalize();
        rest
    }

    pub(crate) fn append(&mut self, other: Paragraph) {
        if self.fragments.is_empty() && !other.fragments.is_empty() {
            self.format = other.format;
        }
        self.fragments.extend(other.fragments);
        self.normalize();
    }

    pub(crate) fn insert_fragments(&mut self, local: usize, fragments: Vec<Fragment>) {
        let idx = self.split_fragment_at(local);
        self.fragments.splice(idx..idx, fragments);
        self.normalize();
    }

    /// Copy of the fragments covering `[start, end)`
    pub(crate) fn slice(&self, start: usize, end: usize) -> Paragraph {
        let mut piece = Paragraph::empty_with_format(self.format_before(start));
        let mut offset = 0;
        for fragment in &self.fragments {
            let len = fragment.len();
            let from = start.max(offset);
            let to = end.min(offset + len);
            if from < to {
                let a = char_to_byte_idx(&fragment.text, from - offset);
                let b = char_to_byte_idx(&fragment.text, to - offset);
                piece.push_str(&fragment.text[a..b], fragment.format);
            }
            offset += len;
        }
        piece
    }

    /// Remove `[start, end)`; an emptied paragraph keeps the removed format
    /// for subsequent typing.
    pub(crate) fn remove(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let removed_format = self.format_of_char(start);
        let a = self.split_fragment_at(start);
        let b = self.split_fragment_at(end);
        self.fragments.drain(a..b);
        if self.fragments.is_empty() {
            if let Some(format) = removed_format {
                self.format = format;
            }
        }
        self.normalize();
    }

    /// Apply `f` to every format in `[start, end)`. Covering the whole
    /// paragraph also updates its typing format.
    pub(crate) fn map_format(
        &mut self,
        start: usize,
        end: usize,
        f: &mut dyn FnMut(&mut CharFormat),
    ) {
        if start == 0 && end >= self.len() {
            f(&mut self.format);
        }
        if start < end {
            let a = self.split_fragment_at(start);
            let b = self.split_fragment_at(end);
            for fragment in &mut self.fragments[a..b] {
                f(&mut fragment.format);
            }
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        self.format = self.format.normalized();
        let mut merged: Vec<Fragment> = Vec::with_capacity(self.fragments.len());
        for mut fragment in self.fragments.drain(..) {
            if fragment.text.is_empty() {
                continue;
            }
            fragment.format = fragment.format.normalized();
            match merged.last_mut() {
                Some(last) if last.format == fragment.format => {
                    last.text.push_str(&fragment.text)
                }
                _ => merged.push(fragment),
            }
        }
        self.fragments = merged;
        if let Some(first) = self.fragments.first() {
            self.format = first.format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::format::FormatAttribute;

    fn bold() -> CharFormat {
        CharFormat::new().with(FormatAttribute::Bold, true)
    }

    #[test]
    fn test_push_str_merges_same_format() {
        let mut p = Paragraph::new();
        p.push_str("ab", CharFormat::new());
        p.push_str("cd", CharFormat::new());
        p.push_str("ef", bold());
        assert_eq!(p.fragments().len(), 2);
        assert_eq!(p.text(), "abcdef");
        assert_eq!(p.len(), 6);
    }

    #[test]
    fn test_split_off_and_append() {
        let mut p = Paragraph::from_fragments(vec![
            Fragment::new("Hello ", CharFormat::new()),
            Fragment::new("world", bold()),
        ]);
        let tail = p.split_off(8);
        assert_eq!(p.text(), "Hello wo");
        assert_eq!(tail.text(), "rld");
        assert_eq!(tail.fragments()[0].format, bold());

        p.append(tail);
        assert_eq!(p.text(), "Hello world");
        assert_eq!(p.fragments().len(), 2);
    }

    #[test]
    fn test_remove_keeps_format_of_emptied_paragraph() {
        let mut p = Paragraph::from_text("abc", bold());
        p.remove(0, 3);
        assert!(p.is_empty());
        assert_eq!(p.format(), bold());
        assert_eq!(p.format_before(0), bold());
    }

    #[test]
    fn test_map_format_splits_fragments() {
        let mut p = Paragraph::from_text("hello world", CharFormat::new());
        p.map_format(0, 5, &mut |f| f.set(FormatAttribute::Bold, true));
        assert_eq!(p.fragments().len(), 2);
        assert_eq!(p.fragments()[0].text, "hello");
        assert!(p.fragments()[0].format.is_bold());
        assert_eq!(p.fragments()[1].text, " world");

        p.map_format(0, 11, &mut |f| f.set(FormatAttribute::Bold, false));
        assert_eq!(p.fragments().len(), 1);
        assert!(p.fragments()[0].format.is_plain());
    }

    #[test]
    fn test_format_before_and_of_char() {
        let p = Paragraph::from_fragments(vec![
            Fragment::new("ab", bold()),
            Fragment::new("cd", CharFormat::new()),
        ]);
        assert_eq!(p.format_before(0), bold());
        assert_eq!(p.format_before(2), bold());
        assert_eq!(p.format_before(3), CharFormat::new());
        assert_eq!(p.format_of_char(2), Some(CharFormat::new()));
        assert_eq!(p.format_of_char(4), None);
        assert_eq!(p.char_at(3), Some('d'));
    }

    #[test]
    fn test_slice_multibyte() {
        let p = Paragraph::from_text("héllo", CharFormat::new());
        assert_eq!(p.slice(1, 3).text(), "él");
    }
}
