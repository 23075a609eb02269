//! Theme property operations on converted markup: listing, previewing with
//! default values, and editing defaults in place.

use crate::canonical;
use crate::types::ThemeProperty;
use std::collections::{HashMap, HashSet};

const NAMED_COLORS: &[&str] = &[
    "black", "silver", "gray", "grey", "white", "maroon", "red", "purple", "fuchsia", "green",
    "lime", "olive", "yellow", "navy", "blue", "teal", "aqua", "orange", "pink", "brown",
    "cyan", "magenta", "gold", "indigo", "violet", "beige", "coral", "crimson", "darkblue",
    "darkgray", "darkgrey", "darkgreen", "darkred", "lightblue", "lightgray", "lightgrey",
    "lightgreen", "navyblue", "salmon", "tan", "tomato", "turquoise", "whitesmoke",
    "transparent",
];

/// Whether a default value is a literal color: `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa`, `rgb(...)`, `rgba(...)` or a named color. Anything else is
/// treated as not a color.
pub fn is_color_value(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = value.to_ascii_lowercase();
    if (lower.starts_with("rgb(") || lower.starts_with("rgba(")) && lower.ends_with(')') {
        return true;
    }
    NAMED_COLORS.contains(&lower.as_str())
}

/// List the theme properties of a converted document, in document order.
/// Repeated `(id, default)` pairs are listed once.
pub fn extract_properties(document: &str) -> Vec<ThemeProperty> {
    let mut seen = HashSet::new();
    canonical::scan(document)
        .into_iter()
        .filter(|tag| seen.insert((tag.property_id.clone(), tag.default_value.clone())))
        .map(|tag| ThemeProperty {
            is_color: is_color_value(&tag.default_value),
            property_id: tag.property_id,
            default_value: tag.default_value,
        })
        .collect()
}

/// Replace every canonical tag with its default value.
pub fn substitute_defaults(document: &str) -> String {
    canonical::replace_tags(document, |tag| tag.default_value.clone())
}

/// Set new default values for the edited identifiers. Tags of identifiers
/// not in `edits` are left untouched and unknown identifiers are ignored.
pub fn apply_edits(document: &str, edits: &HashMap<String, String>) -> String {
    if edits.is_empty() {
        return document.to_string();
    }
    canonical::replace_tags(document, |tag| match edits.get(&tag.property_id) {
        Some(new_value) => tag.raw_text.replacen(
            &format!(r#"default="{}""#, tag.default_value),
            &format!(r#"default="{}""#, new_value),
            1,
        ),
        None => tag.raw_text.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = concat!(
        r##"<div style="background: <tag:theme_prop:body_background default="#fff" />">"##,
        r#"<a style="font-size: <tag:theme_prop:ad_title_font_size default="16px" />">"#,
        r##"<tag:theme_prop:body_background default="#fff" /></a></div>"##,
    );

    #[test]
    fn test_is_color_value() {
        for value in ["#fff", "#FFFFFF", "#ffff", "#12345678", "rgb(0, 0, 0)", "RGBA(0,0,0,.5)", "Navy", " red "] {
            assert!(is_color_value(value), "expected color: {}", value);
        }
        for value in ["16px", "#ggg", "#12345", "Arial", "", "rgb(0,0,0"] {
            assert!(!is_color_value(value), "expected non-color: {}", value);
        }
    }

    #[test]
    fn test_extract_properties_deduplicates_pairs() {
        let properties = extract_properties(DOC);
        assert_eq!(
            properties,
            vec![
                ThemeProperty {
                    property_id: "body_background".to_string(),
                    default_value: "#fff".to_string(),
                    is_color: true,
                },
                ThemeProperty {
                    property_id: "ad_title_font_size".to_string(),
                    default_value: "16px".to_string(),
                    is_color: false,
                },
            ]
        );
    }

    #[test]
    fn test_extract_keeps_same_id_with_different_values() {
        let doc = r#"<tag:theme_prop:a default="1" /><tag:theme_prop:a default="2" />"#;
        assert_eq!(extract_properties(doc).len(), 2);
    }

    #[test]
    fn test_substitute_defaults() {
        assert_eq!(
            substitute_defaults(DOC),
            r#"<div style="background: #fff"><a style="font-size: 16px">#fff</a></div>"#
        );
    }

    #[test]
    fn test_apply_edits() {
        let mut edits = HashMap::new();
        edits.insert("body_background".to_string(), "#222".to_string());
        let edited = apply_edits(DOC, &edits);

        assert_eq!(edited.matches(r##"body_background default="#222""##).count(), 2);
        assert!(edited.contains(r#"<tag:theme_prop:ad_title_font_size default="16px" />"#));
    }

    #[test]
    fn test_apply_edits_unknown_identifier() {
        let mut edits = HashMap::new();
        edits.insert("missing_prop".to_string(), "x".to_string());
        assert_eq!(apply_edits(DOC, &edits), DOC);
    }
}
