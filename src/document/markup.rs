//! Rich-text markup codec.
//!
//! The markup is the subtitle flavour of HTML: `<b>`, `<i>`, `<u>`, `<s>`
//! and `<font color="...">`, with `<br>` (or a newline) between paragraphs.
//! `<span style="...">`, `<strong>`, `<em>` and `<p>` are also understood so
//! payloads from other rich-text producers paste reasonably. Unknown tags are
//! dropped, their text kept.

use super::format::{CharFormat, Color, FormatAttribute};
use super::paragraph::Paragraph;
use super::DocumentFragment;

const KNOWN_TAGS: &[&str] = &[
    "b", "i", "u", "s", "strike", "del", "strong", "em", "font", "span", "br", "p", "html",
    "body",
];

/// Heuristic check for markup: does the text contain a recognizable tag?
pub fn looks_like_markup(text: &str) -> bool {
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find('>') else {
            return false;
        };
        if let Some(tag) = parse_tag(&rest[..close]) {
            if KNOWN_TAGS.contains(&tag.name.as_str()) {
                return true;
            }
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attributes: Vec<(String, String)>,
}

impl Tag {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse the inside of `<...>`; `None` when it is not tag-shaped.
fn parse_tag(inner: &str) -> Option<Tag> {
    if inner.starts_with(char::is_whitespace) {
        return None;
    }
    let inner = inner.trim_end();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, inner),
    };
    let (self_closing, inner) = match inner.strip_suffix('/') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, inner),
    };

    let name_end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = &inner[..name_end];
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let rest = &inner[name_end..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(Tag {
        name: name.to_ascii_lowercase(),
        closing,
        self_closing,
        attributes: parse_attributes(rest),
    })
}

fn parse_attributes(mut rest: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    loop {
        rest = rest.trim_start();
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        if key_end == 0 {
            break;
        }
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();
        let Some(after_eq) = rest.strip_prefix('=') else {
            attributes.push((key, String::new()));
            continue;
        };
        let after_eq = after_eq.trim_start();
        let (value, remainder) = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                match body.find(quote) {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = after_eq
                    .find(char::is_whitespace)
                    .unwrap_or(after_eq.len());
                (&after_eq[..end], &after_eq[end..])
            }
        };
        attributes.push((key, decode_entities(value)));
        rest = remainder;
    }
    attributes
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match tail.find(';').and_then(|semi| Some((semi, decode_entity(&tail[..semi])?))) {
            Some((semi, ch)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Format a tag applies on top of the enclosing format
fn tag_format(tag: &Tag) -> CharFormat {
    let mut format = CharFormat::new();
    match tag.name.as_str() {
        "b" | "strong" => format.set(FormatAttribute::Bold, true),
        "i" | "em" => format.set(FormatAttribute::Italic, true),
        "u" => format.set(FormatAttribute::Underline, true),
        "s" | "strike" | "del" => format.set(FormatAttribute::Strikeout, true),
        "font" => {
            format.foreground = tag.attribute("color").and_then(Color::from_hex);
        }
        "span" => {
            if let Some(style) = tag.attribute("style") {
                apply_css(&mut format, style);
            }
        }
        _ => {}
    }
    format
}

fn apply_css(format: &mut CharFormat, style: &str) {
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match property.trim().to_ascii_lowercase().as_str() {
            "color" => format.foreground = Color::from_hex(&value),
            "font-weight" => {
                let heavy = value == "bold" || value.parse::<u32>().is_ok_and(|w| w >= 600);
                format.set(FormatAttribute::Bold, heavy);
            }
            "font-style" => format.set(FormatAttribute::Italic, value == "italic"),
            "text-decoration" => {
                if value.contains("underline") {
                    format.set(FormatAttribute::Underline, true);
                }
                if value.contains("line-through") {
                    format.set(FormatAttribute::Strikeout, true);
                }
            }
            _ => {}
        }
    }
}

struct Builder {
    paragraphs: Vec<Paragraph>,
    stack: Vec<(String, CharFormat)>,
    base: CharFormat,
    pending_break: bool,
}

impl Builder {
    fn current_format(&self) -> CharFormat {
        self.stack.last().map(|(_, f)| *f).unwrap_or(self.base)
    }

    fn current_paragraph(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::empty_with_format(self.base));
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    fn break_paragraph(&mut self) {
        self.pending_break = false;
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::empty_with_format(self.base));
        }
        let format = self.current_format();
        self.paragraphs.push(Paragraph::empty_with_format(format));
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending_break {
            self.break_paragraph();
        }
        let format = self.current_format();
        self.current_paragraph().push_str(text, format);
    }

    fn open(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "br" => self.break_paragraph(),
            "p" => {
                let started = self.paragraphs.last().is_some_and(|p| !p.is_empty());
                if started || self.pending_break {
                    self.break_paragraph();
                }
            }
            _ if tag.self_closing => {}
            name => {
                let format = self.current_format().merged(&tag_format(tag));
                self.stack.push((name.to_string(), format));
            }
        }
    }

    fn close(&mut self, tag: &Tag) {
        if tag.name == "p" {
            self.pending_break = true;
            return;
        }
        if let Some(idx) = self.stack.iter().rposition(|(name, _)| *name == tag.name) {
            self.stack.truncate(idx);
        }
    }
}

/// Parse markup into a document fragment, with `base` as the outer format.
pub fn parse_markup(markup: &str, base: CharFormat) -> DocumentFragment {
    let mut builder = Builder {
        paragraphs: Vec::new(),
        stack: Vec::new(),
        base,
        pending_break: false,
    };

    let mut rest = markup;
    while !rest.is_empty() {
        let next = rest.find(['<', '\n']).unwrap_or(rest.len());
        let mut text = &rest[..next];
        if rest[next..].starts_with('\n') {
            text = text.strip_suffix('\r').unwrap_or(text);
        }
        builder.push_text(&decode_entities(text));
        rest = &rest[next..];

        if let Some(after) = rest.strip_prefix('\n') {
            builder.break_paragraph();
            rest = after;
        } else if let Some(after) = rest.strip_prefix('<') {
            match after.find('>').and_then(|close| Some((close, parse_tag(&after[..close])?))) {
                Some((close, tag)) => {
                    if tag.closing {
                        builder.close(&tag);
                    } else {
                        builder.open(&tag);
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    builder.push_text("<");
                    rest = after;
                }
            }
        }
    }

    if builder.paragraphs.is_empty() {
        builder.paragraphs.push(Paragraph::empty_with_format(base));
    }
    DocumentFragment::from_paragraphs(builder.paragraphs)
}

fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
}

/// Serialize a fragment; [`parse_markup`] restores it exactly.
pub fn to_markup(fragment: &DocumentFragment) -> String {
    let mut out = String::new();
    for (idx, paragraph) in fragment.paragraphs().iter().enumerate() {
        if idx > 0 {
            out.push_str("<br>");
        }
        for run in paragraph.fragments() {
            let format = run.format;
            if let Some(color) = format.foreground {
                out.push_str(&format!("<font color=\"{}\">", color.to_hex()));
            }
            for attribute in FormatAttribute::ALL {
                if format.get(attribute) {
                    out.push_str(&format!("<{}>", attribute.tag()));
                }
            }
            escape(&run.text, &mut out);
            for attribute in FormatAttribute::ALL.iter().rev() {
                if format.get(*attribute) {
                    out.push_str(&format!("</{}>", attribute.tag()));
                }
            }
            if format.foreground.is_some() {
                out.push_str("</font>");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("<b>bold</b>"));
        assert!(looks_like_markup("line<br>break"));
        assert!(looks_like_markup("<font color=\"#ff0000\">red</font>"));
        assert!(!looks_like_markup("a < b and c > d"));
        assert!(!looks_like_markup("<not-a-tag>"));
        assert!(!looks_like_markup("plain text"));
        assert!(!looks_like_markup("x <3"));
    }

    #[test]
    fn test_parse_nested_tags() {
        let fragment = parse_markup("a<b>b<i>c</i></b>d", CharFormat::new());
        let paragraph = &fragment.paragraphs()[0];
        let runs = paragraph.fragments();
        assert_eq!(paragraph.text(), "abcd");
        assert_eq!(runs.len(), 4);
        assert!(runs[1].format.is_bold());
        assert!(!runs[1].format.is_italic());
        assert!(runs[2].format.is_bold() && runs[2].format.is_italic());
        assert!(runs[3].format.is_plain());
    }

    #[test]
    fn test_parse_paragraph_breaks() {
        let fragment = parse_markup("one<br>two\nthree", CharFormat::new());
        let texts: Vec<String> = fragment.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);

        let fragment = parse_markup("<p>one</p><p>two</p>", CharFormat::new());
        let texts: Vec<String> = fragment.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_parse_font_color_and_entities() {
        let fragment = parse_markup(
            "<font color=\"#00ff00\">a &lt;&amp;&gt; b</font>",
            CharFormat::new(),
        );
        let run = &fragment.paragraphs()[0].fragments()[0];
        assert_eq!(run.text, "a <&> b");
        assert_eq!(run.format.foreground, Some(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_span_style() {
        let fragment = parse_markup(
            "<span style=\"font-weight:700; text-decoration: underline\">x</span>",
            CharFormat::new(),
        );
        let format = fragment.paragraphs()[0].fragments()[0].format;
        assert!(format.is_bold());
        assert!(format.is_underline());
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        let fragment = parse_markup("a <b", CharFormat::new());
        assert_eq!(fragment.text(), "a <b");
    }

    #[test]
    fn test_serialize_then_parse_is_lossless() {
        let source = "<font color=\"#ff0000\"><b>red</b></font> plain <i><u>iu</u></i><br><s>x</s> &amp;";
        let fragment = parse_markup(source, CharFormat::new());
        let markup = to_markup(&fragment);
        assert_eq!(parse_markup(&markup, CharFormat::new()), fragment);
    }

    #[test]
    fn test_lone_carriage_return_is_kept() {
        let fragment = parse_markup("a\r<b>b</b>\r\nc\r", CharFormat::new());
        let texts: Vec<String> = fragment.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["a\rb", "c\r"]);

        let markup = to_markup(&fragment);
        assert_eq!(parse_markup(&markup, CharFormat::new()), fragment);
    }
}
