//! Context heuristics for telling colliding property identifiers apart
//!
//! The classifier looks only at a bounded window of text preceding a tag.
//! It is not a CSS parser: braces are counted, never matched against a
//! grammar, and nothing outside the window is consulted.

use crate::types::PROPERTY_LOOKBACK_CHARS;
use regex::Regex;
use std::sync::OnceLock;

/// Suffix inferred from the text surrounding a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSuffix {
    /// Inside an `@media` block.
    Desktop,
    /// Assigned to a CSS property whose name mentions border and color.
    Border,
    /// Inside an `arrow-text` rule.
    CtaText,
    /// Inside an `arrow` or `cta` rule.
    Cta,
    /// Inside a `title` rule.
    Title,
}

impl ContextSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextSuffix::Desktop => "_desktop",
            ContextSuffix::Border => "_border",
            ContextSuffix::CtaText => "_cta_text",
            ContextSuffix::Cta => "_cta",
            ContextSuffix::Title => "_title",
        }
    }
}

/// The text of at most `max_chars` characters ending right before `position`.
pub fn window_before(text: &str, position: usize, max_chars: usize) -> &str {
    let mut end = position.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let head = &text[..end];
    if max_chars == 0 {
        return "";
    }
    let start = head
        .char_indices()
        .rev()
        .nth(max_chars - 1)
        .map_or(0, |(index, _)| index);
    &head[start..]
}

fn property_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // property name directly before the tag: `border-color: <tag`
    REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z-][A-Za-z0-9_-]*)\s*:\s*\z").expect("property pattern is valid")
    })
}

fn class_selector_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\.([a-z-]+)").expect("selector pattern is valid"))
}

pub struct ContextClassifier;

impl ContextClassifier {
    /// Infer a suffix from the window preceding a tag. Rules are tried in
    /// priority order and the first one that fires wins.
    pub fn classify(window: &str) -> Option<ContextSuffix> {
        if Self::inside_media_block(window) {
            return Some(ContextSuffix::Desktop);
        }
        if let Some(property) = Self::preceding_property(window) {
            let property = property.to_ascii_lowercase();
            if property.contains("border") && property.contains("color") {
                return Some(ContextSuffix::Border);
            }
        }
        Self::open_class_selector(window).and_then(Self::classify_selector)
    }

    /// Whether the last `@media` in the window is still open at its end.
    pub fn inside_media_block(window: &str) -> bool {
        match window.rfind("@media") {
            Some(start) => {
                let rest = &window[start..];
                let opens = rest.matches('{').count();
                let closes = rest.matches('}').count();
                opens > closes
            }
            None => false,
        }
    }

    /// The CSS property name the tag is the value of, if the window ends
    /// with `property:`.
    pub fn preceding_property(window: &str) -> Option<&str> {
        let tail = window_before(window, window.len(), PROPERTY_LOOKBACK_CHARS);
        property_regex()
            .captures(tail)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// The last class selector whose rule block is still open at the end of
    /// the window.
    ///
    /// A selector token opens a block if the first `{`, `}` or `;` after it
    /// is a `{`. That block is unclosed if the brace depth never drops back
    /// below it before the window ends.
    pub fn open_class_selector(window: &str) -> Option<&str> {
        let delimiters: Vec<(usize, char)> = window
            .char_indices()
            .filter(|&(_, c)| matches!(c, '{' | '}' | ';'))
            .collect();
        let unclosed = unclosed_braces(&delimiters);

        class_selector_regex()
            .captures_iter(window)
            .filter_map(|caps| {
                let token = caps.get(0)?;
                let next = delimiters.partition_point(|&(index, _)| index < token.end());
                match delimiters.get(next) {
                    Some(&(brace, '{')) if unclosed.binary_search(&brace).is_ok() => {
                        caps.get(1).map(|m| m.as_str())
                    }
                    _ => None,
                }
            })
            .last()
    }

    pub fn classify_selector(selector: &str) -> Option<ContextSuffix> {
        if selector.contains("arrow-text") {
            Some(ContextSuffix::CtaText)
        } else if selector.contains("arrow") || selector.contains("cta") {
            Some(ContextSuffix::Cta)
        } else if selector.contains("title") {
            Some(ContextSuffix::Title)
        } else {
            None
        }
    }
}

/// Byte offsets of the `{` that no later `}` closes, in ascending order.
fn unclosed_braces(delimiters: &[(usize, char)]) -> Vec<usize> {
    let mut open = Vec::new();
    for &(index, ch) in delimiters {
        match ch {
            '{' => open.push(index),
            '}' => {
                open.pop();
            }
            _ => {}
        }
    }
    open
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_before() {
        let text = "0123456789";
        assert_eq!(window_before(text, 10, 4), "6789");
        assert_eq!(window_before(text, 5, 100), "01234");
        assert_eq!(window_before(text, 5, 0), "");
        assert_eq!(window_before(text, 50, 3), "789");
    }

    #[test]
    fn test_window_before_counts_characters() {
        let text = "héllo wörld";
        let position = text.find('w').unwrap();
        assert_eq!(window_before(text, position, 5), "éllo ");
        // a position inside a multibyte character is moved back
        assert_eq!(window_before(text, 2, 10), "h");
    }

    #[test]
    fn test_media_block() {
        assert!(ContextClassifier::inside_media_block(
            "@media (min-width: 768px) { .ad { color: "
        ));
        assert!(!ContextClassifier::inside_media_block(
            "@media (min-width: 768px) { .ad { color: red; } } .ad { color: blue; } "
        ));
        assert!(!ContextClassifier::inside_media_block(".ad { color: "));
    }

    #[test]
    fn test_preceding_property() {
        assert_eq!(
            ContextClassifier::preceding_property(".ad { border-color: "),
            Some("border-color")
        );
        assert_eq!(
            ContextClassifier::preceding_property("<div style=\"color:"),
            Some("color")
        );
        assert_eq!(
            ContextClassifier::preceding_property(".ad { border: 1px solid "),
            None
        );
    }

    #[test]
    fn test_property_search_limited_to_tail() {
        let window = format!(".ad {{ border-color: {}", " ".repeat(400));
        assert_eq!(ContextClassifier::preceding_property(&window), None);
    }

    #[test]
    fn test_open_class_selector() {
        assert_eq!(
            ContextClassifier::open_class_selector(".title { color: red; }\n.arrow-cta {\n  border: "),
            Some("arrow-cta")
        );
        assert_eq!(
            ContextClassifier::open_class_selector(".title { color: red; }\ndiv { color: "),
            None
        );
        assert_eq!(
            ContextClassifier::open_class_selector(".title { .inner { } color: "),
            Some("title")
        );
        assert_eq!(
            ContextClassifier::open_class_selector(".box { background: url(img.png); color: "),
            Some("box")
        );
    }

    #[test]
    fn test_open_class_selector_in_dotted_prose() {
        let prose = "see v1.2 and www.example.com for details. ".repeat(200);
        assert_eq!(ContextClassifier::open_class_selector(&prose), None);

        let window = format!("{prose}<style>.cta-button {{ color: ");
        assert_eq!(ContextClassifier::open_class_selector(&window), Some("cta-button"));
    }

    #[test]
    fn test_unclosed_braces() {
        let delimiters: Vec<(usize, char)> = "{a{b}c;{"
            .char_indices()
            .filter(|&(_, c)| matches!(c, '{' | '}' | ';'))
            .collect();
        assert_eq!(unclosed_braces(&delimiters), vec![0, 7]);
    }

    #[test]
    fn test_classify_selector() {
        assert_eq!(ContextClassifier::classify_selector("ad-arrow-text"), Some(ContextSuffix::CtaText));
        assert_eq!(ContextClassifier::classify_selector("arrow-cta"), Some(ContextSuffix::Cta));
        assert_eq!(ContextClassifier::classify_selector("cta-button"), Some(ContextSuffix::Cta));
        assert_eq!(ContextClassifier::classify_selector("ad-title"), Some(ContextSuffix::Title));
        assert_eq!(ContextClassifier::classify_selector("ad-body"), None);
    }

    #[test]
    fn test_priority_order() {
        // media scope beats everything
        let window = "@media screen { .arrow-cta { border-color: ";
        assert_eq!(ContextClassifier::classify(window), Some(ContextSuffix::Desktop));

        // border-color property beats the selector
        let window = ".arrow-cta { border-color: ";
        assert_eq!(ContextClassifier::classify(window), Some(ContextSuffix::Border));

        // only the CSS property name counts, not the selector or tag names
        let window = ".arrow-cta { border: 1px solid ";
        assert_eq!(ContextClassifier::classify(window), Some(ContextSuffix::Cta));

        assert_eq!(ContextClassifier::classify("<p>plain "), None);
    }
}
