//! Text utilities: char/byte conversion, grapheme and word boundaries.
//!
//! All offsets here are char offsets (Unicode scalar values), matching the
//! document's position model.

use unicode_segmentation::UnicodeSegmentation;

/// Character class used for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Alphanumeric characters (word characters)
    WordChar,
    /// Punctuation and symbols
    Punctuation,
}

/// Get the character type for word navigation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if ch.is_alphanumeric() || ch == '_' {
        CharType::WordChar
    } else {
        CharType::Punctuation
    }
}

/// Byte index of the `char_idx`-th char (or `text.len()` past the end)
pub fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring by char range, clamped to the text
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start = char_to_byte_idx(text, start);
    let end = char_to_byte_idx(text, end).max(start);
    &text[start..end]
}

/// One segment produced by Unicode word segmentation (UAX #29)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSegment {
    pub start: usize,
    pub end: usize,
    pub kind: CharType,
}

/// Split `text` at Unicode word boundaries, classifying each segment.
pub fn word_segments(text: &str) -> Vec<WordSegment> {
    let mut segments = Vec::new();
    let mut offset = 0;
    for word in text.split_word_bounds() {
        let len = char_len(word);
        let kind = if word.chars().all(char::is_whitespace) {
            CharType::Whitespace
        } else if word.chars().any(|c| char_type(c) == CharType::WordChar) {
            CharType::WordChar
        } else {
            CharType::Punctuation
        };
        segments.push(WordSegment {
            start: offset,
            end: offset + len,
            kind,
        });
        offset += len;
    }
    segments
}

/// Start of the next word after `offset`, or the end of the text.
///
/// The segment under `offset` is skipped, then any whitespace after it.
pub fn next_word_start(text: &str, offset: usize) -> usize {
    let segments = word_segments(text);
    let len = segments.last().map(|s| s.end).unwrap_or(0);
    if offset >= len {
        return len;
    }

    let mut rest = segments.iter().skip_while(|s| s.end <= offset);
    let Some(current) = rest.next() else {
        return len;
    };
    let mut pos = current.end;
    for segment in rest {
        if segment.kind != CharType::Whitespace {
            break;
        }
        pos = segment.end;
    }
    pos
}

/// Start of the word before `offset` (whitespace is skipped first).
pub fn prev_word_start(text: &str, offset: usize) -> usize {
    word_segments(text)
        .iter()
        .rev()
        .filter(|s| s.start < offset)
        .find(|s| s.kind != CharType::Whitespace)
        .map(|s| s.start)
        .unwrap_or(0)
}

/// Bounds of the word touching `offset`, preferring the word after it.
pub fn word_at(text: &str, offset: usize) -> Option<(usize, usize)> {
    let segments = word_segments(text);
    let after = segments
        .iter()
        .find(|s| s.start <= offset && offset < s.end && s.kind == CharType::WordChar);
    let before = || {
        segments
            .iter()
            .find(|s| s.end == offset && s.kind == CharType::WordChar)
    };
    after.or_else(before).map(|s| (s.start, s.end))
}

/// Start of the word that ends at `offset`, or `offset` itself when the
/// char before it is not part of a word.
pub fn word_start_before(text: &str, offset: usize) -> usize {
    word_segments(text)
        .iter()
        .find(|s| s.start < offset && offset <= s.end && s.kind == CharType::WordChar)
        .map(|s| s.start)
        .unwrap_or(offset)
}

fn grapheme_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut offset = 0;
    text.graphemes(true).map(move |g| {
        let start = offset;
        offset += char_len(g);
        start
    })
}

/// First grapheme boundary after `offset` (clamped to the text length)
pub fn next_grapheme_boundary(text: &str, offset: usize) -> usize {
    let len = char_len(text);
    grapheme_starts(text)
        .find(|&start| start > offset)
        .unwrap_or(len)
        .min(len)
}

/// Last grapheme boundary before `offset`
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> usize {
    grapheme_starts(text)
        .take_while(|&start| start < offset)
        .last()
        .unwrap_or(0)
}

/// Replace chars that cannot be rendered on a single row with a space.
///
/// Control chars other than tab, line/paragraph separators and the object
/// replacement char all display as an ordinary space.
pub fn display_char(ch: char) -> char {
    match ch {
        '\t' => '\t',
        c if (c as u32) < 0x20 => ' ',
        '\u{2028}' | '\u{2029}' | '\u{fffc}' => ' ',
        c => c,
    }
}
