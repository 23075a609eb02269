//! Legacy `<tagd:style />` tag recognition
//!
//! Legacy tags carry three attributes in one of two fixed orders:
//!
//! ```text
//! <tagd:style name="CMContentArea" value="#fff" type="color" />
//! <tagd:style type="color" name="CMContentArea" value="#fff" />
//! ```
//!
//! Attribute and tag names match case-insensitively. Values are taken
//! literally. A tag uses either double or single quotes throughout; anything
//! that does not fit the grammar is left alone and reported as unrecognized.

use crate::types::{AttributeOrder, LegacyTagOccurrence, LEGACY_TAG_MARKER};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

pub struct TagRecognizer {
    patterns: Vec<(AttributeOrder, Regex)>,
    marker_regex: Regex,
}

/// Capture group indices of name/value/type for a given attribute order.
struct Groups {
    name: usize,
    value: usize,
    tag_type: usize,
}

impl AttributeOrder {
    fn groups(self) -> Groups {
        match self {
            AttributeOrder::NameValueType => Groups { name: 1, value: 2, tag_type: 3 },
            AttributeOrder::TypeNameValue => Groups { name: 2, value: 3, tag_type: 1 },
        }
    }

    fn attributes(self) -> [(&'static str, bool); 3] {
        // (attribute, may be empty)
        match self {
            AttributeOrder::NameValueType => [("name", false), ("value", true), ("type", false)],
            AttributeOrder::TypeNameValue => [("type", false), ("name", false), ("value", true)],
        }
    }
}

fn legacy_pattern(order: AttributeOrder, quote: char) -> String {
    let mut pattern = String::from(r"(?i)<tagd:style");
    for (attribute, may_be_empty) in order.attributes() {
        let repeat = if may_be_empty { '*' } else { '+' };
        pattern.push_str(&format!(r#"\s+{attribute}={quote}([^"']{repeat}){quote}"#));
    }
    pattern.push_str(r"\s*/>");
    pattern
}

impl TagRecognizer {
    pub fn new() -> Self {
        let mut patterns = Vec::with_capacity(4);
        for order in [AttributeOrder::NameValueType, AttributeOrder::TypeNameValue] {
            for quote in ['"', '\''] {
                let regex = Regex::new(&legacy_pattern(order, quote))
                    .expect("legacy tag pattern is valid");
                patterns.push((order, regex));
            }
        }
        Self {
            patterns,
            marker_regex: Regex::new(&format!("(?i){}", regex::escape(LEGACY_TAG_MARKER)))
                .expect("marker pattern is valid"),
        }
    }

    /// Shared recognizer; the compiled patterns are immutable.
    pub fn shared() -> &'static TagRecognizer {
        static RECOGNIZER: OnceLock<TagRecognizer> = OnceLock::new();
        RECOGNIZER.get_or_init(TagRecognizer::new)
    }

    /// Find every well-formed legacy tag, in document order.
    ///
    /// Tags matched by the `name, value, type` pass are never matched again
    /// by the `type, name, value` pass.
    pub fn recognize(&self, text: &str) -> Vec<LegacyTagOccurrence> {
        let mut first_pass: Vec<(Range<usize>, AttributeOrder, [String; 3])> = Vec::new();
        let mut second_pass = Vec::new();

        for (order, regex) in &self.patterns {
            let groups = order.groups();
            for caps in regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let field = |index: usize| {
                    caps.get(index)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default()
                };
                let fields = [field(groups.name), field(groups.value), field(groups.tag_type)];
                let entry = (whole.range(), *order, fields);
                match order {
                    AttributeOrder::NameValueType => first_pass.push(entry),
                    AttributeOrder::TypeNameValue => second_pass.push(entry),
                }
            }
        }

        first_pass.sort_by_key(|(range, _, _)| range.start);
        let claimed: Vec<Range<usize>> = first_pass.iter().map(|(r, _, _)| r.clone()).collect();

        let mut matches = first_pass;
        for entry in second_pass {
            if overlaps(&claimed, &entry.0) {
                log::trace!("Skipping second-pass match at {}: already claimed", entry.0.start);
                continue;
            }
            matches.push(entry);
        }
        matches.sort_by_key(|(range, _, _)| range.start);

        matches
            .into_iter()
            .enumerate()
            .map(|(sequence, (range, order, [name, value, tag_type]))| LegacyTagOccurrence {
                sequence,
                name,
                value,
                tag_type,
                position: range.start,
                raw_text: text[range].to_string(),
                order,
            })
            .collect()
    }

    /// Count `<tagd:style` markers, whether or not they form a valid tag.
    pub fn count_markers(&self, text: &str) -> usize {
        self.marker_regex.find_iter(text).count()
    }
}

impl Default for TagRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// `claimed` must be sorted by start and non-overlapping.
fn overlaps(claimed: &[Range<usize>], range: &Range<usize>) -> bool {
    let idx = claimed.partition_point(|c| c.end <= range.start);
    claimed
        .get(idx)
        .map_or(false, |c| c.start < range.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_value_type_order() {
        let text = r##"<p style="background: <tagd:style name="CMContentArea" value="#fff" type="color" />"></p>"##;
        let tags = TagRecognizer::shared().recognize(text);

        assert_eq!(tags.len(), 1);
        let tag = &tags[0];
        assert_eq!(tag.sequence, 0);
        assert_eq!(tag.name, "CMContentArea");
        assert_eq!(tag.value, "#fff");
        assert_eq!(tag.tag_type, "color");
        assert_eq!(tag.order, AttributeOrder::NameValueType);
        assert_eq!(&text[tag.position..tag.end()], tag.raw_text);
        assert!(tag.raw_text.starts_with("<tagd:style"));
    }

    #[test]
    fn test_type_name_value_order() {
        let text = r#"<tagd:style type="font-size" name="HeaderText" value="14px"/>"#;
        let tags = TagRecognizer::shared().recognize(text);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "HeaderText");
        assert_eq!(tags[0].value, "14px");
        assert_eq!(tags[0].tag_type, "font-size");
        assert_eq!(tags[0].order, AttributeOrder::TypeNameValue);
    }

    #[test]
    fn test_single_quotes_and_case_insensitive_attributes() {
        let text = "<TAGD:STYLE NAME='HeaderArea' Value='#000' TYPE='color' />";
        let tags = TagRecognizer::shared().recognize(text);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "HeaderArea");
        assert_eq!(tags[0].value, "#000");
    }

    #[test]
    fn test_mixed_quotes_not_recognized() {
        let text = r#"<tagd:style name="HeaderArea" value='#000' type="color" />"#;
        assert!(TagRecognizer::shared().recognize(text).is_empty());
        assert_eq!(TagRecognizer::shared().count_markers(text), 1);
    }

    #[test]
    fn test_malformed_tags_are_skipped() {
        let text = concat!(
            r#"<tagd:style name="A" type="color" />"#,
            r#"<tagd:style name="B" value="x type="color" />"#,
            r#"<tagd:style name="C" value="" type="color" />"#,
        );
        let tags = TagRecognizer::shared().recognize(text);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "C");
        assert_eq!(tags[0].value, "");
        assert_eq!(TagRecognizer::shared().count_markers(text), 3);
    }

    #[test]
    fn test_mixed_orders_keep_document_order() {
        let text = concat!(
            r#"a <tagd:style type="color" name="First" value="1" /> "#,
            r#"b <tagd:style name="Second" value="2" type="color" /> "#,
            "c <tagd:style\n    type='color'\n    name='Third'\n    value='3' />",
        );
        let tags = TagRecognizer::shared().recognize(text);

        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        let sequences: Vec<usize> = tags.iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert!(tags.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn test_overlap_check() {
        let claimed = vec![0..10, 20..30];
        assert!(overlaps(&claimed, &(5..8)));
        assert!(overlaps(&claimed, &(25..40)));
        assert!(!overlaps(&claimed, &(10..20)));
        assert!(!overlaps(&claimed, &(30..35)));
    }
}
