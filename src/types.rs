//! Core data types shared by the conversion passes

use serde::Serialize;

/// Length, in characters, of the source text inspected before a tag when
/// disambiguating a collision.
pub const CONTEXT_WINDOW_CHARS: usize = 1000;

/// Length, in characters, of the window tail searched for the CSS property
/// a tag is assigned to.
pub const PROPERTY_LOOKBACK_CHARS: usize = 300;

/// Opening marker of a legacy style tag.
pub const LEGACY_TAG_MARKER: &str = "<tagd:style";

/// Opening marker of a canonical theme property tag.
pub const CANONICAL_TAG_PREFIX: &str = "<tag:theme_prop:";

/// A legacy `<tagd:style ... />` tag found in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTagOccurrence {
    /// Zero-based index in source order, shared with the canonical tag
    /// produced from this occurrence.
    pub sequence: usize,
    pub name: String,
    pub value: String,
    pub tag_type: String,
    /// Byte offset of the tag in the original document.
    pub position: usize,
    pub raw_text: String,
    pub order: AttributeOrder,
}

impl LegacyTagOccurrence {
    /// Byte offset one past the end of the tag.
    pub fn end(&self) -> usize {
        self.position + self.raw_text.len()
    }
}

/// The two attribute orders the legacy dialect allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOrder {
    /// `name, value, type`
    NameValueType,
    /// `type, name, value`
    TypeNameValue,
}

impl AttributeOrder {
    pub fn pass(self) -> u8 {
        match self {
            AttributeOrder::NameValueType => 1,
            AttributeOrder::TypeNameValue => 2,
        }
    }
}

/// A `<tag:theme_prop:ID default="VALUE" />` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTag {
    /// Sequence number of the legacy occurrence this tag was rewritten from,
    /// or `None` when the tag was already canonical in the input.
    pub sequence: Option<usize>,
    pub property_id: String,
    pub default_value: String,
    /// Byte offset of the tag in the text it was found in.
    pub position: usize,
    pub raw_text: String,
}

impl CanonicalTag {
    pub fn end(&self) -> usize {
        self.position + self.raw_text.len()
    }
}

/// All occurrences of one property identifier that appears two or more times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub property_id: String,
    /// Occurrences in document order; the first one keeps its identifier.
    pub tags: Vec<CanonicalTag>,
}

/// How a property identifier was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Mapped,
    Derived,
}

/// How a renamed duplicate got its new suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixSource {
    Context,
    Positional,
}

/// A single identifier rename applied to the converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub position: usize,
    pub original_raw: String,
    pub replacement_raw: String,
    pub from: String,
    pub to: String,
    pub source: SuffixSource,
    pub correlated: bool,
}

/// An editable theme property extracted from canonical markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeProperty {
    pub property_id: String,
    pub default_value: String,
    pub is_color: bool,
}
