//! Character formats and the attributes that can be toggled on them.

use serde::{Deserialize, Serialize};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// A boolean attribute of [`CharFormat`] that the editor can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatAttribute {
    Bold,
    Italic,
    Underline,
    Strikeout,
}

impl FormatAttribute {
    pub const ALL: [FormatAttribute; 4] = [
        FormatAttribute::Bold,
        FormatAttribute::Italic,
        FormatAttribute::Underline,
        FormatAttribute::Strikeout,
    ];

    /// Markup tag name used by the rich-text codec
    pub fn tag(self) -> &'static str {
        match self {
            FormatAttribute::Bold => "b",
            FormatAttribute::Italic => "i",
            FormatAttribute::Underline => "u",
            FormatAttribute::Strikeout => "s",
        }
    }
}

/// Formatting of a run of characters.
///
/// Every field is optional: `None` means "not set here", so a format can be
/// merged onto another and only override what it sets explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikeout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
}

impl CharFormat {
    pub const fn new() -> Self {
        Self {
            bold: None,
            italic: None,
            underline: None,
            strikeout: None,
            foreground: None,
        }
    }

    pub fn with(mut self, attribute: FormatAttribute, on: bool) -> Self {
        self.set(attribute, on);
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    fn slot(&self, attribute: FormatAttribute) -> Option<bool> {
        match attribute {
            FormatAttribute::Bold => self.bold,
            FormatAttribute::Italic => self.italic,
            FormatAttribute::Underline => self.underline,
            FormatAttribute::Strikeout => self.strikeout,
        }
    }

    fn slot_mut(&mut self, attribute: FormatAttribute) -> &mut Option<bool> {
        match attribute {
            FormatAttribute::Bold => &mut self.bold,
            FormatAttribute::Italic => &mut self.italic,
            FormatAttribute::Underline => &mut self.underline,
            FormatAttribute::Strikeout => &mut self.strikeout,
        }
    }

    /// Effective value of an attribute (unset reads as off)
    pub fn get(&self, attribute: FormatAttribute) -> bool {
        self.slot(attribute).unwrap_or(false)
    }

    /// Explicitly set an attribute
    pub fn set(&mut self, attribute: FormatAttribute, on: bool) {
        *self.slot_mut(attribute) = Some(on);
    }

    pub fn is_bold(&self) -> bool {
        self.get(FormatAttribute::Bold)
    }

    pub fn is_italic(&self) -> bool {
        self.get(FormatAttribute::Italic)
    }

    pub fn is_underline(&self) -> bool {
        self.get(FormatAttribute::Underline)
    }

    pub fn is_strikeout(&self) -> bool {
        self.get(FormatAttribute::Strikeout)
    }

    /// A format that only sets the inverse of `attribute` as read from `self`.
    pub fn toggled(&self, attribute: FormatAttribute) -> CharFormat {
        CharFormat::new().with(attribute, !self.get(attribute))
    }

    /// Override the fields `other` sets explicitly.
    pub fn merge(&mut self, other: &CharFormat) {
        for attribute in FormatAttribute::ALL {
            if let Some(value) = other.slot(attribute) {
                *self.slot_mut(attribute) = Some(value);
            }
        }
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
    }

    pub fn merged(mut self, other: &CharFormat) -> CharFormat {
        self.merge(other);
        self
    }

    /// Canonical stored form: explicit `false` reads the same as unset, so it
    /// is folded away to keep adjacent runs mergeable.
    pub fn normalized(mut self) -> CharFormat {
        for attribute in FormatAttribute::ALL {
            let slot = self.slot_mut(attribute);
            if *slot == Some(false) {
                *slot = None;
            }
        }
        self
    }

    pub fn is_plain(&self) -> bool {
        self.normalized() == CharFormat::new()
    }
}
